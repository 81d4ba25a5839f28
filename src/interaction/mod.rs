//! Gesture state machines and the category toggle
//!
//! These are the only writers of [`crate::state::FilterState`] besides reset
//! and reload.

mod area_brush;
mod axis_brush;
mod category_toggle;

pub use area_brush::{invert_rect, AreaBrush};
pub use axis_brush::AxisBrush;
pub use category_toggle::{bar_position, hit_test, toggle_at, Toggled};

/// What a finished gesture did to its predicate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushOutcome<T> {
    Committed(T),
    Cleared,
}
