//! Application state management
//!
//! [`AppState`] owns the dataset, the single [`FilterState`], both brush
//! machines and the built view models. Every filter mutation goes through it
//! so the order is always mutate, apply, render.

mod controls;
mod filters;
mod ui;

pub use controls::{Controls, TimeGranularity};
pub use filters::{FilterState, SpatialBounds, TimeRange};
pub use ui::{LoadStatus, UiState};

use log::{debug, info};

use crate::config::DashboardConfig;
use crate::data::DatasetStore;
use crate::interaction::{toggle_at, AreaBrush, AxisBrush, BrushOutcome, Toggled};
use crate::scale::{GeoProjection, TimeScale};
use crate::views::{RenderDispatcher, Snapshot, ViewSet};

/// Main application state container
#[derive(Debug, Default)]
pub struct AppState {
    /// Records of the current load cycle
    pub store: DatasetStore,

    /// Indices into `store` passing all filters
    pub filtered: Vec<usize>,

    pub filters: FilterState,
    pub controls: Controls,
    pub preview_rows: usize,

    pub axis_brush: AxisBrush,
    pub area_brush: AreaBrush,

    /// Built view models
    pub views: RenderDispatcher,

    pub ui: UiState,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            controls: config.controls(),
            preview_rows: config.preview_rows,
            ..Self::default()
        }
    }

    pub fn has_data(&self) -> bool {
        !self.store.is_empty()
    }

    /// Rebuild `views` from the current snapshot without recomputing
    pub fn render(&mut self, views: ViewSet) {
        let snapshot = Snapshot {
            store: &self.store,
            filtered: &self.filtered,
            controls: &self.controls,
            preview_rows: self.preview_rows,
        };
        self.views.dispatch(views, &snapshot);
    }

    /// Recompute the filtered set, then rebuild `views`
    pub fn apply_and_render(&mut self, views: ViewSet) {
        self.filtered = self.filters.apply(self.store.records());
        self.render(views);
    }

    /// Recompute the filtered set, then run a full render cycle
    pub fn apply_and_render_all(&mut self) {
        self.filtered = self.filters.apply(self.store.records());
        let snapshot = Snapshot {
            store: &self.store,
            filtered: &self.filtered,
            controls: &self.controls,
            preview_rows: self.preview_rows,
        };
        self.views.render_all(&snapshot);
    }

    /// Clear every predicate
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        info!("Filters reset");
        self.apply_and_render_all();
    }

    /// Axis brush released over the histogram. A click without a drag
    /// releases an empty interval and clears the time filter.
    pub fn commit_time_brush(&mut self, scale: &TimeScale) -> BrushOutcome<TimeRange> {
        let outcome = self.axis_brush.release(scale, &mut self.filters);
        debug!("Time brush: {:?}", outcome);
        self.apply_and_render(ViewSet::AFTER_TIME_BRUSH);
        outcome
    }

    /// Area brush released over the scatter canvas
    pub fn commit_area_brush(&mut self, projection: &GeoProjection) -> BrushOutcome<SpatialBounds> {
        let outcome = self.area_brush.release(projection, &mut self.filters);
        debug!("Area brush: {:?}", outcome);
        self.apply_and_render_all();
        outcome
    }

    /// Click on the category chart at plot coordinate `y`
    pub fn toggle_category_at(&mut self, y: f64) -> Option<Toggled> {
        let toggled = toggle_at(&self.views.categories.ranking, y, &mut self.filters)?;
        self.apply_and_render_all();
        Some(toggled)
    }

    pub fn set_top_n(&mut self, top_n: usize) {
        if self.controls.top_n != top_n {
            self.controls.top_n = top_n;
            self.controls.validate();
            self.render(ViewSet::TOP_N);
        }
    }

    pub fn set_granularity(&mut self, granularity: TimeGranularity) {
        if self.controls.granularity != granularity {
            self.controls.granularity = granularity;
            self.render(ViewSet::GRANULARITY);
        }
    }

    /// A retrieval was started; data and filters stay untouched
    pub fn begin_load(&mut self, source: impl Into<String>) {
        self.ui.begin_loading(source);
    }

    /// Replace the dataset, reset all filters, recompute, render everything
    pub fn install(&mut self, store: DatasetStore) {
        info!(
            "Installing {} records from {}",
            store.len(),
            store.source_label()
        );
        self.store = store;
        self.filters.reset();
        self.axis_brush = AxisBrush::new();
        self.area_brush = AreaBrush::new();
        self.apply_and_render_all();
        self.ui.on_data_loaded();
    }

    /// A retrieval failed; previous data stays installed
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.ui.on_load_failed(message);
    }

    pub fn status_text(&self) -> String {
        self.ui.status_text(&self.views.summary.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{loaded_state, sample_records};
    use crate::views::View;
    use chrono::{TimeZone, Utc};
    use eframe::egui::{Pos2, Rect};

    #[test]
    fn test_install_renders_all_and_resets() {
        let mut state = AppState::new(&DashboardConfig::default());
        state.filters.toggle_category("THEFT");
        state.install(DatasetStore::new(sample_records(), 0, "fixture"));

        assert!(!state.filters.is_active());
        assert_eq!(state.filtered.len(), 100);
        assert_eq!(state.status_text(), "Filtered: 100 / 100");
        assert!(View::ALL.iter().all(|v| state.views.generation(*v) == 1));
    }

    #[test]
    fn test_failed_load_preserves_data() {
        let mut state = loaded_state();
        state.filters.toggle_category("THEFT");
        state.apply_and_render_all();

        state.begin_load("https://example.invalid");
        assert_eq!(state.status_text(), "Loading…");
        assert_eq!(state.filtered.len(), 60);

        state.load_failed("HTTP 503");
        assert_eq!(state.status_text(), "Load failed: HTTP 503");
        assert_eq!(state.store.len(), 100);
        assert_eq!(state.filtered.len(), 60);
        assert!(state.filters.is_category_selected("THEFT"));
    }

    #[test]
    fn test_toggle_through_category_chart() {
        let mut state = loaded_state();
        let ranking_len = state.views.categories.ranking.len();
        let top = crate::interaction::bar_position(0, ranking_len);

        let toggled = state.toggle_category_at(top).unwrap();
        assert_eq!(toggled.category, "THEFT");
        assert_eq!(state.filtered.len(), 60);
        assert_eq!(state.views.summary.text(), "Filtered: 60 / 100");

        // the bars were rebuilt from the filtered set, so THEFT is alone on top
        let top = crate::interaction::bar_position(0, state.views.categories.ranking.len());
        state.toggle_category_at(top);
        assert_eq!(state.filtered.len(), 100);
    }

    #[test]
    fn test_time_brush_commit_skips_histogram_rebuild() {
        let mut state = loaded_state();
        let scale = TimeScale::new(
            (
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            ),
            (0.0, 366.0),
        );
        state.axis_brush.press(152.0);
        state.axis_brush.drag_to(182.0, &scale);
        let outcome = state.commit_time_brush(&scale);

        assert!(matches!(outcome, BrushOutcome::Committed(_)));
        assert_eq!(state.filtered.len(), 8);
        assert_eq!(state.views.generation(View::Histogram), 1);
        assert_eq!(state.views.generation(View::Categories), 2);
        assert_eq!(state.views.generation(View::Summary), 2);

        state.reset_filters();
        assert_eq!(state.filtered.len(), 100);
        assert_eq!(state.views.generation(View::Histogram), 2);
    }

    #[test]
    fn test_click_on_histogram_clears_time_filter() {
        let mut state = loaded_state();
        let scale = TimeScale::new(
            (
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            ),
            (0.0, 366.0),
        );
        state.axis_brush.press(152.0);
        state.axis_brush.drag_to(182.0, &scale);
        state.commit_time_brush(&scale);
        assert_eq!(state.filtered.len(), 8);

        state.axis_brush.press(90.0);
        state.axis_brush.drag_to(90.0, &scale);
        assert_eq!(state.commit_time_brush(&scale), BrushOutcome::Cleared);
        assert_eq!(state.filtered.len(), 100);
        assert_eq!(state.views.generation(View::Histogram), 1);
    }

    #[test]
    fn test_area_brush_outside_data_empties_views() {
        let mut state = loaded_state();
        let plot = Rect::from_min_max(Pos2::new(50.0, 20.0), Pos2::new(550.0, 420.0));
        let (lon, lat) = state.views.scatter.extents().unwrap();
        let projection = GeoProjection::new(lon, lat, plot, 5);

        // north-west of every point
        let corner = projection.project(lon.0 - 0.05, lat.1 + 0.05);
        state.area_brush.press(corner);
        state.area_brush.drag_to(Pos2::new(corner.x + 10.0, corner.y + 10.0));
        state.commit_area_brush(&projection);

        assert!(state.filtered.is_empty());
        assert!(state.views.table.shows_placeholder());
        assert_eq!(state.status_text(), "Filtered: 0 / 100");
    }

    #[test]
    fn test_controls_rebuild_only_their_view() {
        let mut state = loaded_state();
        state.set_top_n(1);
        assert_eq!(state.views.categories.ranking.len(), 1);
        assert_eq!(state.views.generation(View::Categories), 2);
        assert_eq!(state.views.generation(View::Histogram), 1);

        state.set_granularity(TimeGranularity::Yearly);
        assert_eq!(state.views.generation(View::Histogram), 2);
        assert_eq!(state.views.generation(View::Scatter), 1);

        // unchanged value is not a dispatch
        state.set_granularity(TimeGranularity::Yearly);
        assert_eq!(state.views.generation(View::Histogram), 2);
    }
}
