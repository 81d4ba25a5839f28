//! Per-view snapshots, rebuilt only by the dispatcher
//!
//! Each builder clears and rebuilds its model from the store and the filtered
//! indices. Nothing here reads or writes filter state.

use chrono::{DateTime, Utc};

use crate::constants::preview::MISSING;
use crate::data::{
    nice_time_domain, rank_categories, time_histogram, CategoryCount, DatasetStore, Record, TimeBin,
};
use crate::state::{Controls, TimeGranularity};

/// Everything a view builder may read
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub store: &'a DatasetStore,
    /// Indices into `store.records()`
    pub filtered: &'a [usize],
    pub controls: &'a Controls,
    pub preview_rows: usize,
}

impl<'a> Snapshot<'a> {
    pub fn filtered_records(&self) -> impl Iterator<Item = &'a Record> + 'a {
        let records = self.store.records();
        let filtered = self.filtered;
        filtered.iter().filter_map(move |&i| records.get(i))
    }
}

/// Filtered counts binned over the raw time extent, niced to whole calendar units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramModel {
    pub bins: Vec<TimeBin>,
    /// Niced raw extent; the x axis never follows the filtered set
    pub domain: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub granularity: TimeGranularity,
    pub max_count: usize,
}

impl HistogramModel {
    pub fn build(snapshot: &Snapshot) -> Self {
        profiling::scope!("build_histogram");

        let granularity = snapshot.controls.granularity;
        let Some((first, last)) = snapshot.store.time_extent() else {
            return Self {
                granularity,
                ..Self::default()
            };
        };
        let (start, end) = nice_time_domain(first, last, granularity);
        let bins = time_histogram(
            snapshot.filtered_records().map(|r| r.timestamp),
            start,
            end,
            granularity,
        );
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
        Self {
            bins,
            domain: Some((start, end)),
            granularity,
            max_count,
        }
    }
}

/// Top-N categories of the filtered set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryModel {
    pub ranking: Vec<CategoryCount>,
}

impl CategoryModel {
    pub fn build(snapshot: &Snapshot) -> Self {
        profiling::scope!("build_categories");
        Self {
            ranking: rank_categories(snapshot.filtered_records(), snapshot.controls.top_n),
        }
    }

    pub fn max_count(&self) -> usize {
        self.ranking.first().map(|c| c.count).unwrap_or(0)
    }
}

/// Filtered points plus the raw extents the projection is built from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterModel {
    /// `[longitude, latitude]`
    pub points: Vec<[f64; 2]>,
    pub lon_extent: Option<(f64, f64)>,
    pub lat_extent: Option<(f64, f64)>,
}

impl ScatterModel {
    pub fn build(snapshot: &Snapshot) -> Self {
        profiling::scope!("build_scatter");
        Self {
            points: snapshot
                .filtered_records()
                .map(|r| [r.longitude, r.latitude])
                .collect(),
            lon_extent: snapshot.store.longitude_extent(),
            lat_extent: snapshot.store.latitude_extent(),
        }
    }

    /// Raw extents, when the store has any records
    pub fn extents(&self) -> Option<((f64, f64), (f64, f64))> {
        Some((self.lon_extent?, self.lat_extent?))
    }
}

/// One formatted preview row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub date: String,
    pub category: String,
    pub coordinates: String,
}

impl PreviewRow {
    pub fn from_record(record: &Record) -> Self {
        let category = if record.category.is_empty() {
            MISSING.to_string()
        } else {
            record.category.clone()
        };
        Self {
            date: record.timestamp.format("%Y-%m-%d").to_string(),
            category,
            coordinates: format!("{:.4} {:.4}", record.latitude, record.longitude),
        }
    }

    pub fn to_tsv(&self) -> String {
        format!("{}\t{}\t{}", self.date, self.category, self.coordinates)
    }
}

/// First rows of the filtered set; empty means the placeholder is shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableModel {
    pub rows: Vec<PreviewRow>,
}

impl TableModel {
    pub const HEADERS: [&'static str; 3] = ["Date", "Type", "Latitude Longitude"];

    pub fn build(snapshot: &Snapshot) -> Self {
        Self {
            rows: snapshot
                .filtered_records()
                .take(snapshot.preview_rows)
                .map(PreviewRow::from_record)
                .collect(),
        }
    }

    pub fn shows_placeholder(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header plus rows as tab-separated text
    pub fn to_tsv(&self) -> String {
        let mut output = Self::HEADERS.join("\t");
        output.push('\n');
        for row in &self.rows {
            output.push_str(&row.to_tsv());
            output.push('\n');
        }
        output
    }
}

/// "Filtered: X / Y"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryModel {
    pub filtered: usize,
    pub total: usize,
}

impl SummaryModel {
    pub fn build(snapshot: &Snapshot) -> Self {
        Self {
            filtered: snapshot.filtered.len(),
            total: snapshot.store.len(),
        }
    }

    pub fn text(&self) -> String {
        format!(
            "Filtered: {} / {}",
            group_thousands(self.filtered),
            group_thousands(self.total)
        )
    }
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_records;
    use crate::state::FilterState;
    use chrono::TimeZone;

    fn store() -> DatasetStore {
        DatasetStore::new(sample_records(), 0, "fixture")
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(50_000), "50,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_histogram_counts_filtered_over_raw_domain() {
        let store = store();
        let controls = Controls::default();
        let mut filters = FilterState::new();
        filters.toggle_category("ASSAULT");
        let filtered = filters.apply(store.records());
        let snapshot = Snapshot {
            store: &store,
            filtered: &filtered,
            controls: &controls,
            preview_rows: 10,
        };

        let model = HistogramModel::build(&snapshot);
        let (first, last) = store.time_extent().unwrap();
        assert_eq!(model.domain, Some(nice_time_domain(first, last, TimeGranularity::Monthly)));
        assert_eq!(model.bins.iter().map(|b| b.count).sum::<usize>(), 40);
        assert_eq!(model.granularity, TimeGranularity::Monthly);
        // sample data covers 2024, so every bin is a whole month
        assert_eq!(model.bins.len(), 12);
    }

    #[test]
    fn test_single_instant_histogram_has_width() {
        let t = Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).unwrap();
        let store = DatasetStore::new(
            vec![Record::new("THEFT", t, 41.8, -87.7).unwrap()],
            0,
            "fixture",
        );
        let controls = Controls {
            granularity: TimeGranularity::Weekly,
            ..Controls::default()
        };
        let snapshot = Snapshot {
            store: &store,
            filtered: &[0],
            controls: &controls,
            preview_rows: 10,
        };

        let model = HistogramModel::build(&snapshot);
        assert_eq!(model.bins.len(), 1);
        assert_eq!(model.bins[0].count, 1);
        assert_eq!(model.bins[0].end - model.bins[0].start, chrono::Duration::days(7));
    }

    #[test]
    fn test_empty_store_builds_empty_models() {
        let store = DatasetStore::default();
        let controls = Controls::default();
        let snapshot = Snapshot {
            store: &store,
            filtered: &[],
            controls: &controls,
            preview_rows: 10,
        };
        assert!(HistogramModel::build(&snapshot).bins.is_empty());
        assert!(ScatterModel::build(&snapshot).extents().is_none());
        assert!(TableModel::build(&snapshot).shows_placeholder());
        assert_eq!(SummaryModel::build(&snapshot).text(), "Filtered: 0 / 0");
    }

    #[test]
    fn test_table_takes_first_rows_of_filtered() {
        let store = store();
        let controls = Controls::default();
        let filtered: Vec<usize> = (0..store.len()).collect();
        let snapshot = Snapshot {
            store: &store,
            filtered: &filtered,
            controls: &controls,
            preview_rows: 10,
        };
        let table = TableModel::build(&snapshot);
        assert_eq!(table.rows.len(), 10);
        // newest first
        assert_eq!(table.rows[0], PreviewRow::from_record(&store.records()[0]));
        assert!(table.to_tsv().starts_with("Date\tType\tLatitude Longitude\n"));
    }

    #[test]
    fn test_preview_row_formatting() {
        let record = Record::new(
            "",
            Utc.with_ymd_and_hms(2024, 3, 7, 22, 15, 0).unwrap(),
            41.881_234_9,
            -87.623_456_1,
        )
        .unwrap();
        let row = PreviewRow::from_record(&record);
        assert_eq!(row.date, "2024-03-07");
        assert_eq!(row.category, "N/A");
        assert_eq!(row.coordinates, "41.8812 -87.6235");
    }
}
