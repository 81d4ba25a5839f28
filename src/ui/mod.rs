mod category_bars;
mod preview_table;
mod scatter;
mod time_histogram;
mod toolbar;

pub use category_bars::render_category_bars;
pub use preview_table::render_preview_table;
pub use scatter::render_scatter;
pub use time_histogram::render_time_histogram;
pub use toolbar::render_toolbar;
