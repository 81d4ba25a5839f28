//! Dataset store: the immutable record set of one load cycle

use chrono::{DateTime, Utc};

use super::record::Record;

/// Holds the loaded records, newest first. Replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    raw: Vec<Record>,
    /// Rows rejected during validation
    dropped: usize,
    /// Where the records came from (URL or file name)
    source_label: String,
}

impl DatasetStore {
    /// Create a store; records are kept in descending timestamp order,
    /// ties keep their retrieval order.
    pub fn new(mut raw: Vec<Record>, dropped: usize, source_label: impl Into<String>) -> Self {
        raw.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self {
            raw,
            dropped,
            source_label: source_label.into(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Earliest and latest timestamp
    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        // Sorted descending, so the ends are the extent
        Some((self.raw.last()?.timestamp, self.raw.first()?.timestamp))
    }

    pub fn longitude_extent(&self) -> Option<(f64, f64)> {
        extent(self.raw.iter().map(|r| r.longitude))
    }

    pub fn latitude_extent(&self) -> Option<(f64, f64)> {
        extent(self.raw.iter().map(|r| r.latitude))
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
