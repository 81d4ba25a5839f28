//! Two-dimensional drag-to-box gesture over the raster scatter canvas
//!
//! The canvas has no retained axes to ask, so the box is inverted by hand
//! through the same [`GeoProjection`] the points were drawn with.

use eframe::egui::{Pos2, Rect};

use super::BrushOutcome;
use crate::constants::brush::AREA_COMMIT_THRESHOLD_PX;
use crate::scale::GeoProjection;
use crate::state::{FilterState, SpatialBounds};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum AreaBrushPhase {
    #[default]
    Idle,
    Dragging {
        anchor: Pos2,
        current: Rect,
    },
}

/// Owned by the scatter surface for its whole lifetime
#[derive(Debug, Clone, Default)]
pub struct AreaBrush {
    phase: AreaBrushPhase,
}

impl AreaBrush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, AreaBrushPhase::Dragging { .. })
    }

    /// Pointer down inside the canvas
    pub fn press(&mut self, pos: Pos2) {
        self.phase = AreaBrushPhase::Dragging {
            anchor: pos,
            current: Rect::from_two_pos(pos, pos),
        };
    }

    /// Pointer move; returns the rectangle to draw as the overlay
    pub fn drag_to(&mut self, pos: Pos2) -> Option<Rect> {
        if let AreaBrushPhase::Dragging { anchor, current } = &mut self.phase {
            *current = Rect::from_two_pos(*anchor, pos);
            return Some(*current);
        }
        None
    }

    /// Translucent overlay rectangle, present only while dragging
    pub fn overlay(&self) -> Option<Rect> {
        match self.phase {
            AreaBrushPhase::Dragging { current, .. } => Some(current),
            AreaBrushPhase::Idle => None,
        }
    }

    /// Pointer up: commit a box larger than the threshold on both sides,
    /// otherwise clear the spatial filter. The overlay is dropped either way.
    pub fn release(&mut self, projection: &GeoProjection, filters: &mut FilterState) -> BrushOutcome<SpatialBounds> {
        let rect = self.overlay();
        self.phase = AreaBrushPhase::Idle;

        let bounds = rect
            .filter(|r| exceeds_threshold(*r))
            .map(|r| invert_rect(r, projection));
        filters.set_spatial_bounds(bounds);
        match bounds {
            Some(b) => BrushOutcome::Committed(b),
            None => BrushOutcome::Cleared,
        }
    }
}

fn exceeds_threshold(rect: Rect) -> bool {
    rect.width() > AREA_COMMIT_THRESHOLD_PX && rect.height() > AREA_COMMIT_THRESHOLD_PX
}

/// Top pixel edge is the northern (max latitude) edge
pub fn invert_rect(rect: Rect, projection: &GeoProjection) -> SpatialBounds {
    let min_lon = projection.x.invert(rect.left() as f64);
    let max_lon = projection.x.invert(rect.right() as f64);
    let max_lat = projection.y.invert(rect.top() as f64);
    let min_lat = projection.y.invert(rect.bottom() as f64);
    SpatialBounds::new(min_lon, min_lat, max_lon, max_lat)
}
