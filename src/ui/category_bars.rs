use eframe::egui::{self, Color32};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotBounds};

use crate::interaction::bar_position;
use crate::state::AppState;

const BAR_COLOR: Color32 = Color32::from_rgb(74, 158, 255);
const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 127, 14);

/// Ranked category bars; clicking a bar toggles its category
pub fn render_category_bars(state: &mut AppState, ui: &mut egui::Ui) {
    profiling::scope!("render_category_bars");

    let ranking = &state.views.categories.ranking;
    if ranking.is_empty() {
        ui.centered_and_justified(|ui| ui.weak("No categories"));
        return;
    }

    let n = ranking.len();
    let labels: Vec<String> = ranking
        .iter()
        .map(|c| if c.category.is_empty() { "N/A".to_string() } else { c.category.clone() })
        .collect();
    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .map(|(rank, c)| {
            let fill = if state.filters.is_category_selected(&c.category) {
                SELECTED_COLOR
            } else {
                BAR_COLOR
            };
            Bar::new(bar_position(rank, n), c.count as f64)
                .width(0.8)
                .name(&labels[rank])
                .fill(fill)
        })
        .collect();
    let x_max = (state.views.categories.max_count().max(1) as f64) * 1.05;

    let plot = Plot::new("category_bars")
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_grid([true, false])
        .y_axis_min_width(120.0)
        .y_grid_spacer(move |_input| {
            (0..n)
                .map(|i| GridMark {
                    value: i as f64,
                    step_size: 1.0,
                })
                .collect()
        })
        .y_axis_formatter(move |mark, _range| {
            let slot = mark.value.round();
            if slot < 0.0 || (mark.value - slot).abs() > 1e-6 {
                return String::new();
            }
            // slot n-1-rank holds rank
            n.checked_sub(1 + slot as usize)
                .and_then(|rank| labels.get(rank).cloned())
                .unwrap_or_default()
        })
        .x_axis_formatter(|mark, _range| format!("{}", mark.value.round() as i64));

    let plot_response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, -0.6], [x_max, n as f64 - 0.4]));
        plot_ui.bar_chart(
            BarChart::new("categories", bars)
                .horizontal()
                .element_formatter(Box::new(|bar, _chart| format!("{}: {}", bar.name, bar.value))),
        );
    });

    let response = &plot_response.response;
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let y = plot_response.transform.value_from_position(pos).y;
            state.toggle_category_at(y);
        }
    }
}
