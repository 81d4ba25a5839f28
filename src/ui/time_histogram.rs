use eframe::egui::{self, Color32, Stroke, StrokeKind};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotBounds, PlotPoints, Polygon};

use crate::data::aggregate::calendar_thresholds;
use crate::scale::{from_seconds, to_seconds, TimeScale};
use crate::state::{AppState, TimeGranularity};

const BAR_COLOR: Color32 = Color32::from_rgb(74, 158, 255);
const BRUSH_FILL: Color32 = Color32::from_rgba_premultiplied(37, 79, 128, 60);

/// Time histogram with the axis brush on top
pub fn render_time_histogram(state: &mut AppState, ui: &mut egui::Ui) {
    profiling::scope!("render_time_histogram");

    let model = &state.views.histogram;
    let Some((start, end)) = model.domain else {
        ui.centered_and_justified(|ui| ui.weak("No data loaded"));
        return;
    };

    let (x_min, x_max) = (to_seconds(start), to_seconds(end));
    let y_max = (model.max_count.max(1) as f64) * 1.1;
    let granularity = model.granularity;
    let marks = calendar_marks(x_min, x_max, granularity);

    let bars: Vec<Bar> = model
        .bins
        .iter()
        .map(|bin| {
            let (x0, x1) = (to_seconds(bin.start), to_seconds(bin.end));
            Bar::new((x0 + x1) / 2.0, bin.count as f64)
                .width((x1 - x0) * 0.95)
                .name(format!(
                    "{} – {}",
                    bin.start.format("%Y-%m-%d"),
                    bin.end.format("%Y-%m-%d")
                ))
        })
        .collect();
    let committed = state.filters.time_range();

    let plot = Plot::new("time_histogram")
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_grid([false, true])
        .x_grid_spacer(move |_input| marks.clone())
        .x_axis_formatter(move |mark, _range| {
            from_seconds(mark.value)
                .format(granularity.tick_format())
                .to_string()
        })
        .y_axis_formatter(|mark, _range| format!("{}", mark.value.round() as i64));

    let plot_response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, 0.0], [x_max, y_max]));
        plot_ui.bar_chart(
            BarChart::new("count", bars)
                .color(BAR_COLOR)
                .element_formatter(Box::new(|bar, _chart| format!("{}\n{}", bar.name, bar.value))),
        );

        if let Some(range) = committed {
            let (a, b) = (to_seconds(range.start), to_seconds(range.end));
            plot_ui.polygon(
                Polygon::new(
                    "selection",
                    PlotPoints::from(vec![[a, 0.0], [b, 0.0], [b, y_max], [a, y_max]]),
                )
                .fill_color(BRUSH_FILL)
                .stroke(Stroke::new(1.0, BAR_COLOR)),
            );
        }
    });

    let frame = *plot_response.transform.frame();
    let scale = TimeScale::new(
        (from_seconds(x_min), from_seconds(x_max)),
        (frame.left() as f64, frame.right() as f64),
    );
    let response = &plot_response.response;
    let pointer = response.interact_pointer_pos();

    // egui reports a drag only after the pointer leaves the click distance,
    // so the anchor comes from where the button went down
    if response.is_pointer_button_down_on() {
        if !state.axis_brush.is_dragging() {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                state.axis_brush.press(origin.x);
            }
        }
        if let Some(pos) = pointer {
            state.axis_brush.drag_to(pos.x, &scale);
        }
    }

    // A click without movement releases a zero-width interval, which clears
    if response.drag_stopped() || response.clicked() {
        if let Some(pos) = pointer {
            state.axis_brush.drag_to(pos.x, &scale);
        }
        state.commit_time_brush(&scale);
    }

    // Live brush extent, feedback only
    if let Some((lo, hi)) = state.axis_brush.pixel_interval(&scale) {
        let rect = egui::Rect::from_x_y_ranges(lo..=hi, frame.y_range());
        ui.painter().rect(
            rect,
            0.0,
            BRUSH_FILL,
            Stroke::new(1.0, BAR_COLOR),
            StrokeKind::Inside,
        );
    }
}

/// Calendar-aligned grid marks, thinned to the granularity's tick count
fn calendar_marks(x_min: f64, x_max: f64, granularity: TimeGranularity) -> Vec<GridMark> {
    let boundaries = calendar_thresholds(from_seconds(x_min), from_seconds(x_max), granularity);
    let stride = boundaries.len().div_ceil(granularity.tick_count()).max(1);
    let step_size = match granularity {
        TimeGranularity::Weekly => 7.0 * 86_400.0,
        TimeGranularity::Monthly => 30.0 * 86_400.0,
        TimeGranularity::Yearly => 365.0 * 86_400.0,
    } * stride as f64;

    boundaries
        .iter()
        .step_by(stride)
        .map(|t| GridMark {
            value: to_seconds(*t),
            step_size,
        })
        .collect()
}
