pub mod aggregate;
pub mod record;
pub mod source;
pub mod store;

// Re-export key types for convenience
pub use aggregate::{nice_time_domain, rank_categories, time_histogram, CategoryCount, TimeBin};
pub use record::{FieldMap, Record};
pub use source::{DatasetSource, FileSource, SodaSource};
pub use store::DatasetStore;
