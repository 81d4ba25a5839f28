//! View models and the render dispatcher

mod dispatcher;
mod models;

pub use dispatcher::{RenderDispatcher, View, ViewSet};
pub use models::{
    group_thousands, CategoryModel, HistogramModel, PreviewRow, ScatterModel, Snapshot, SummaryModel,
    TableModel,
};
