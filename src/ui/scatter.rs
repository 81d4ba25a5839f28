//! Raster scatter canvas with the area brush
//!
//! Drawn straight onto a painter; the same [`GeoProjection`] drives drawing,
//! tick placement and brush inversion.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind};

use crate::constants::scatter::*;
use crate::scale::{tick_step, GeoProjection, LinearScale};
use crate::state::AppState;

const POINT_COLOR: Color32 = Color32::from_rgba_premultiplied(128, 128, 128, 128);
const BRUSH_STROKE: Color32 = Color32::from_rgb(74, 158, 255);
const BRUSH_FILL: Color32 = Color32::from_rgba_premultiplied(15, 32, 51, 51);
const TICK_LENGTH: f32 = 6.0;

/// Inner plotting area of the canvas
pub fn plot_rect(canvas: Rect) -> Rect {
    Rect::from_min_max(
        Pos2::new(canvas.left() + MARGIN_LEFT, canvas.top() + MARGIN_TOP),
        Pos2::new(
            (canvas.right() - MARGIN_RIGHT).max(canvas.left() + MARGIN_LEFT),
            (canvas.bottom() - MARGIN_BOTTOM).max(canvas.top() + MARGIN_TOP),
        ),
    )
}

pub fn render_scatter(state: &mut AppState, ui: &mut egui::Ui) {
    profiling::scope!("render_scatter");

    let Some((lon_extent, lat_extent)) = state.views.scatter.extents() else {
        ui.centered_and_justified(|ui| ui.weak("No data loaded"));
        return;
    };

    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let inner = plot_rect(response.rect);
    let projection = GeoProjection::new(lon_extent, lat_extent, inner, TICK_COUNT);

    let pointer = response.interact_pointer_pos();
    if response.is_pointer_button_down_on() {
        // anchor where the button went down, not where egui decided it was a drag
        if !state.area_brush.is_dragging() {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                state.area_brush.press(origin);
            }
        }
        if let Some(pos) = pointer {
            state.area_brush.drag_to(pos);
        }
    }
    // Small boxes arrive as clicks; the threshold decides commit or clear
    if response.drag_stopped() || response.clicked() {
        if let Some(pos) = pointer {
            state.area_brush.drag_to(pos);
        }
        state.commit_area_brush(&projection);
    }

    let text_color = ui.visuals().text_color();
    let axis_stroke = Stroke::new(1.0, ui.visuals().weak_text_color());
    draw_axes(&painter, &projection, inner, axis_stroke, text_color);

    {
        profiling::scope!("scatter_points");
        for [lon, lat] in &state.views.scatter.points {
            let p = projection.project(*lon, *lat);
            if inner.contains(p) {
                painter.circle_filled(p, POINT_RADIUS, POINT_COLOR);
            }
        }
    }

    if let Some(rect) = state.area_brush.overlay() {
        painter.rect(
            rect,
            0.0,
            BRUSH_FILL,
            Stroke::new(1.0, BRUSH_STROKE),
            StrokeKind::Inside,
        );
    }
}

fn draw_axes(painter: &egui::Painter, projection: &GeoProjection, inner: Rect, stroke: Stroke, color: Color32) {
    let font = FontId::proportional(11.0);

    painter.line_segment([inner.left_bottom(), inner.right_bottom()], stroke);
    for (value, label) in tick_labels(&projection.x) {
        let x = projection.x.apply(value) as f32;
        let base = Pos2::new(x, inner.bottom());
        painter.line_segment([base, Pos2::new(x, base.y + TICK_LENGTH)], stroke);
        painter.text(
            Pos2::new(x, base.y + TICK_LENGTH + 2.0),
            Align2::CENTER_TOP,
            label,
            font.clone(),
            color,
        );
    }

    painter.line_segment([inner.left_top(), inner.left_bottom()], stroke);
    for (value, label) in tick_labels(&projection.y) {
        let y = projection.y.apply(value) as f32;
        let base = Pos2::new(inner.left(), y);
        painter.line_segment([base, Pos2::new(base.x - TICK_LENGTH, y)], stroke);
        painter.text(
            Pos2::new(base.x - TICK_LENGTH - 2.0, y),
            Align2::RIGHT_CENTER,
            label,
            font.clone(),
            color,
        );
    }
}

/// Tick values with labels carrying just enough decimals for the step
fn tick_labels(scale: &LinearScale) -> Vec<(f64, String)> {
    let ticks = scale.ticks(TICK_COUNT);
    let (lo, hi) = scale.domain();
    let step = tick_step(lo, hi, TICK_COUNT);
    let decimals = if step >= 1.0 || !step.is_finite() {
        0
    } else {
        (-step.log10() - 1e-9).ceil().max(0.0) as usize
    };
    ticks
        .into_iter()
        .map(|t| (t, format!("{:.*}", decimals, t)))
        .collect()
}
