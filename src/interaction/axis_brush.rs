//! One-dimensional drag-to-range gesture over the time axis

use super::BrushOutcome;
use crate::scale::TimeScale;
use crate::state::{FilterState, TimeRange};

/// Gesture phase. Committing is a transition, not a state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum AxisBrushPhase {
    #[default]
    Idle,
    Dragging {
        anchor: f32,
        current: f32,
    },
}

/// Owned by the histogram surface for its whole lifetime
#[derive(Debug, Clone, Default)]
pub struct AxisBrush {
    phase: AxisBrushPhase,
}

impl AxisBrush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, AxisBrushPhase::Dragging { .. })
    }

    /// Drag start at pixel `x`
    pub fn press(&mut self, x: f32) {
        self.phase = AxisBrushPhase::Dragging {
            anchor: x,
            current: x,
        };
    }

    /// Pointer move; returns the live candidate range for feedback only
    pub fn drag_to(&mut self, x: f32, scale: &TimeScale) -> Option<TimeRange> {
        if let AxisBrushPhase::Dragging { current, .. } = &mut self.phase {
            *current = x;
        }
        self.candidate(scale)
    }

    /// Live pixel interval `[min, max]`, clamped to the axis range
    pub fn pixel_interval(&self, scale: &TimeScale) -> Option<(f32, f32)> {
        let AxisBrushPhase::Dragging { anchor, current } = self.phase else {
            return None;
        };
        let (r0, r1) = scale.range();
        let (lo_limit, hi_limit) = (r0.min(r1) as f32, r0.max(r1) as f32);
        let lo = anchor.min(current).clamp(lo_limit, hi_limit);
        let hi = anchor.max(current).clamp(lo_limit, hi_limit);
        Some((lo, hi))
    }

    /// Time range under the current interval, None while degenerate
    pub fn candidate(&self, scale: &TimeScale) -> Option<TimeRange> {
        let (lo, hi) = self.pixel_interval(scale)?;
        if hi <= lo {
            return None;
        }
        Some(TimeRange::new(
            scale.invert(lo as f64),
            scale.invert(hi as f64),
        ))
    }

    /// Drag end: commit the interval or, if it is empty, clear the time filter
    pub fn release(&mut self, scale: &TimeScale, filters: &mut FilterState) -> BrushOutcome<TimeRange> {
        let selection = self.candidate(scale);
        self.phase = AxisBrushPhase::Idle;
        filters.set_time_range(selection);
        match selection {
            Some(range) => BrushOutcome::Committed(range),
            None => BrushOutcome::Cleared,
        }
    }
}
