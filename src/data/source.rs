//! Dataset sources: the remote SODA endpoint and local CSV/Parquet exports
//!
//! Both sources hand back a fully validated [`DatasetStore`]; malformed rows
//! are counted and dropped here and never reach the filter engine.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use polars::prelude::*;
use reqwest::Url;
use serde_json::{Map, Value};

use super::record::{parse_timestamp, FieldMap, Record};
use super::store::DatasetStore;
use crate::constants::source::REQUEST_TIMEOUT_SECS;
use crate::error::{ExplorerError, Result};

/// Anything that can produce a dataset of at most `limit` records,
/// newest first.
pub trait DatasetSource: Send {
    fn fetch(&self, limit: usize) -> Result<DatasetStore>;

    /// Short label for the status line
    fn describe(&self) -> String;
}

/// Socrata (SODA) JSON endpoint
#[derive(Debug, Clone)]
pub struct SodaSource {
    endpoint: String,
    fields: FieldMap,
}

impl SodaSource {
    pub fn new(endpoint: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            endpoint: endpoint.into(),
            fields,
        }
    }

    /// Query URL selecting the mapped fields, newest first, capped at `limit`
    pub fn request_url(&self, limit: usize) -> Result<Url> {
        let order = format!("{} DESC", self.fields.timestamp);
        let limit = limit.to_string();
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("$select", self.fields.select_list()),
                ("$order", order),
                ("$limit", limit),
            ],
        )
        .map_err(|e| ExplorerError::Config(format!("invalid endpoint '{}': {}", self.endpoint, e)))
    }
}

impl DatasetSource for SodaSource {
    fn fetch(&self, limit: usize) -> Result<DatasetStore> {
        profiling::scope!("soda_fetch");

        let url = self.request_url(limit)?;
        info!("Requesting up to {} rows from {}", limit, self.endpoint);

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let rows: Vec<Map<String, Value>> = response.json()?;
        let (records, dropped) = records_from_json_rows(&rows, &self.fields);
        Ok(DatasetStore::new(records, dropped, self.describe()))
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Validate decoded JSON rows, returning the kept records and the drop count
pub fn records_from_json_rows(rows: &[Map<String, Value>], fields: &FieldMap) -> (Vec<Record>, usize) {
    let records: Vec<Record> = rows
        .iter()
        .filter_map(|row| Record::from_json_row(row, fields))
        .collect();
    let dropped = rows.len() - records.len();
    if dropped > 0 {
        debug!("Dropped {} malformed rows of {}", dropped, rows.len());
    }
    (records, dropped)
}

/// Local CSV or Parquet export with the same four columns
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    fields: FieldMap,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, fields: FieldMap) -> Self {
        Self {
            path: path.into(),
            fields,
        }
    }

    fn read_dataframe(&self) -> Result<DataFrame> {
        let extension = self
            .path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ExplorerError::UnsupportedFormat {
                extension: String::new(),
            })?;

        let df = match extension.to_lowercase().as_str() {
            "parquet" => LazyFrame::scan_parquet(&self.path, Default::default())?.collect()?,
            "csv" => LazyCsvReader::new(&self.path)
                .with_has_header(true)
                .with_infer_schema_length(Some(100))
                .with_try_parse_dates(true)
                .finish()?
                .collect()?,
            ext => {
                return Err(ExplorerError::UnsupportedFormat {
                    extension: ext.to_string(),
                })
            }
        };
        Ok(df)
    }
}

impl DatasetSource for FileSource {
    fn fetch(&self, limit: usize) -> Result<DatasetStore> {
        profiling::scope!("file_fetch");

        info!("Reading {}", self.path.display());
        let df = self.read_dataframe()?;
        let (mut records, dropped) = records_from_dataframe(&df, &self.fields)?;
        if dropped > 0 {
            debug!("Dropped {} malformed rows of {}", dropped, df.height());
        }

        // Same contract as the endpoint: newest `limit` rows
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(DatasetStore::new(records, dropped, self.describe()))
    }

    fn describe(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| ExplorerError::ColumnNotFound {
            column: name.to_string(),
        })
}

/// Extract validated records from a frame holding the mapped columns
pub fn records_from_dataframe(df: &DataFrame, fields: &FieldMap) -> Result<(Vec<Record>, usize)> {
    let categories = string_values(column(df, &fields.category)?)?;
    let timestamps = timestamp_values(column(df, &fields.timestamp)?)?;
    let latitudes = float_values(column(df, &fields.latitude)?)?;
    let longitudes = float_values(column(df, &fields.longitude)?)?;

    let total = df.height();
    let records: Vec<Record> = categories
        .into_iter()
        .zip(timestamps)
        .zip(latitudes.into_iter().zip(longitudes))
        .filter_map(|((category, timestamp), (lat, lon))| {
            Record::new(category.unwrap_or_default(), timestamp?, lat?, lon?)
        })
        .collect();
    let dropped = total - records.len();
    Ok((records, dropped))
}

fn string_values(series: &Series) -> Result<Vec<Option<String>>> {
    let cast = series.cast(&DataType::String)?;
    Ok(cast.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn float_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Datetime and Date columns are converted directly; anything else is parsed
/// as text.
fn timestamp_values(series: &Series) -> Result<Vec<Option<DateTime<Utc>>>> {
    match series.dtype() {
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let ints = series.cast(&DataType::Int64)?;
            Ok(ints
                .i64()?
                .into_iter()
                .map(|v| v.and_then(|v| from_time_unit(v, unit)))
                .collect())
        }
        DataType::Date => {
            let days = series.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|v| v.and_then(|d| DateTime::from_timestamp(d as i64 * 86_400, 0)))
                .collect())
        }
        _ => Ok(string_values(series)?
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_timestamp))
            .collect()),
    }
}

fn from_time_unit(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_request_url_params() {
        let source = SodaSource::new("https://example.org/resource/abcd.json", FieldMap::default());
        let url = source.request_url(500).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("$select".into(), "primary_type,date,latitude,longitude".into())));
        assert!(pairs.contains(&("$order".into(), "date DESC".into())));
        assert!(pairs.contains(&("$limit".into(), "500".into())));
    }

    #[test]
    fn test_request_url_rejects_bad_endpoint() {
        let source = SodaSource::new("not a url", FieldMap::default());
        assert!(matches!(source.request_url(10), Err(ExplorerError::Config(_))));
    }

    #[test]
    fn test_records_from_json_rows_counts_drops() {
        let body = r#"[
            {"primary_type": "THEFT", "date": "2024-05-01T10:00:00.000", "latitude": "41.8", "longitude": "-87.6"},
            {"primary_type": "THEFT", "date": null, "latitude": "41.8", "longitude": "-87.6"},
            {"primary_type": "ASSAULT", "date": "2024-05-02T10:00:00.000"},
            {"primary_type": "ASSAULT", "date": "2024-05-03T10:00:00.000", "latitude": 41.7, "longitude": -87.5}
        ]"#;
        let rows: Vec<Map<String, Value>> = serde_json::from_str(body).unwrap();
        let (records, dropped) = records_from_json_rows(&rows, &FieldMap::default());
        assert_eq!(records.len(), 2);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_file_source_csv() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "primary_type,date,latitude,longitude").unwrap();
        writeln!(file, "THEFT,2024-01-05T10:00:00,41.80,-87.60").unwrap();
        writeln!(file, "ASSAULT,2024-01-07T10:00:00,41.90,-87.70").unwrap();
        writeln!(file, "THEFT,2024-01-06T10:00:00,,-87.65").unwrap();
        writeln!(file, "BATTERY,2024-01-03T10:00:00,41.85,-87.62").unwrap();
        file.flush().unwrap();

        let source = FileSource::new(file.path(), FieldMap::default());
        let store = source.fetch(2).unwrap();

        assert_eq!(store.dropped(), 1);
        assert_eq!(store.len(), 2);
        // newest two of the three valid rows
        assert_eq!(store.records()[0].timestamp.day(), 7);
        assert_eq!(store.records()[1].timestamp.day(), 5);
    }

    #[test]
    fn test_file_source_missing_column() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "kind,date,latitude,longitude").unwrap();
        writeln!(file, "THEFT,2024-01-05T10:00:00,41.80,-87.60").unwrap();
        file.flush().unwrap();

        let source = FileSource::new(file.path(), FieldMap::default());
        assert!(matches!(
            source.fetch(10),
            Err(ExplorerError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_file_source_unsupported_extension() {
        let source = FileSource::new("incidents.xlsx", FieldMap::default());
        assert!(matches!(
            source.fetch(10),
            Err(ExplorerError::UnsupportedFormat { .. })
        ));
    }
}
