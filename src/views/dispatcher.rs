//! Recompute-then-redraw dispatch across the linked views

use super::models::{CategoryModel, HistogramModel, ScatterModel, Snapshot, SummaryModel, TableModel};

/// One dependent view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Histogram,
    Categories,
    Scatter,
    Table,
    Summary,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Histogram,
        View::Categories,
        View::Scatter,
        View::Table,
        View::Summary,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of views to rebuild in one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewSet(u8);

impl ViewSet {
    pub const ALL: ViewSet = ViewSet(0b1_1111);

    /// Time brush commit: everything downstream of the histogram
    pub const AFTER_TIME_BRUSH: ViewSet = ViewSet(0b1_1110);

    /// Changing the ranking length only affects the bars
    pub const TOP_N: ViewSet = ViewSet(0b0_0010);

    /// Changing bin width only affects the histogram
    pub const GRANULARITY: ViewSet = ViewSet(0b0_0001);

    pub fn contains(self, view: View) -> bool {
        self.0 & view.bit() != 0
    }
}

/// Owns the built view models and counts how often each one was rebuilt
#[derive(Debug, Clone, Default)]
pub struct RenderDispatcher {
    pub histogram: HistogramModel,
    pub categories: CategoryModel,
    pub scatter: ScatterModel,
    pub table: TableModel,
    pub summary: SummaryModel,
    generations: [u64; 5],
}

impl RenderDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every view in `views` from `snapshot`
    pub fn dispatch(&mut self, views: ViewSet, snapshot: &Snapshot) {
        profiling::scope!("dispatch");

        for view in View::ALL.into_iter().filter(|v| views.contains(*v)) {
            match view {
                View::Histogram => self.histogram = HistogramModel::build(snapshot),
                View::Categories => self.categories = CategoryModel::build(snapshot),
                View::Scatter => self.scatter = ScatterModel::build(snapshot),
                View::Table => self.table = TableModel::build(snapshot),
                View::Summary => self.summary = SummaryModel::build(snapshot),
            }
            self.generations[view as usize] += 1;
        }
        log::trace!("rebuilt views {:?}", views);
    }

    /// Full render cycle
    pub fn render_all(&mut self, snapshot: &Snapshot) {
        self.dispatch(ViewSet::ALL, snapshot);
    }

    /// Number of rebuilds of `view` so far
    pub fn generation(&self, view: View) -> u64 {
        self.generations[view as usize]
    }
}
