//! Incident records and row validation

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::source::*;

/// A single validated incident. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Record {
    /// Build a record from already-typed values, rejecting non-finite coordinates.
    pub fn new(
        category: impl Into<String>,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(Self {
            category: category.into(),
            timestamp,
            latitude,
            longitude,
        })
    }

    /// Validate one JSON row from the dataset endpoint.
    /// Returns None for rows that must never enter the store.
    pub fn from_json_row(row: &Map<String, Value>, fields: &FieldMap) -> Option<Self> {
        let timestamp = row
            .get(&fields.timestamp)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)?;
        let latitude = row.get(&fields.latitude).and_then(parse_coordinate)?;
        let longitude = row.get(&fields.longitude).and_then(parse_coordinate)?;
        let category = row
            .get(&fields.category)
            .and_then(Value::as_str)
            .unwrap_or_default();

        Self::new(category, timestamp, latitude, longitude)
    }
}

/// Names of the four source fields a record is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    pub category: String,
    pub timestamp: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            category: CATEGORY_FIELD.to_string(),
            timestamp: TIMESTAMP_FIELD.to_string(),
            latitude: LATITUDE_FIELD.to_string(),
            longitude: LONGITUDE_FIELD.to_string(),
        }
    }
}

impl FieldMap {
    /// Field list in the order used for `$select`
    pub fn select_list(&self) -> String {
        [
            self.category.as_str(),
            self.timestamp.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
        .join(",")
    }
}

/// Parse a timestamp string. Strings without an offset are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // Socrata floating timestamps and the usual export shapes
    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",       // 2024-01-15T14:30:00.000
        "%Y-%m-%dT%H:%M:%S",          // 2024-01-15T14:30:00
        "%Y-%m-%dT%H:%M",             // 2024-01-15T14:30
        "%Y-%m-%d %H:%M:%S%.f",       // 2024-01-15 14:30:00.123
        "%Y-%m-%d %H:%M:%S",          // 2024-01-15 14:30:00
        "%Y-%m-%d %H:%M",             // 2024-01-15 14:30
        "%m/%d/%Y %I:%M:%S %p",       // 01/15/2024 02:30:00 PM (portal CSV export)
        "%m/%d/%Y %H:%M:%S",          // 01/15/2024 14:30:00
        "%Y/%m/%d %H:%M:%S",          // 2024/01/15 14:30:00
    ];
    for format in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc());
        }
    }

    let date_formats = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for format in &date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Accept numbers or numeric strings; anything non-finite is rejected.
pub fn parse_coordinate(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn row(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-06-01T14:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T14:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("06/01/2024 02:30:00 PM"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-06-01"),
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(&json!(41.88)), Some(41.88));
        assert_eq!(parse_coordinate(&json!("-87.63")), Some(-87.63));
        assert_eq!(parse_coordinate(&json!("NaN")), None);
        assert_eq!(parse_coordinate(&json!("")), None);
        assert_eq!(parse_coordinate(&Value::Null), None);
    }

    #[test]
    fn test_from_json_row_valid() {
        let fields = FieldMap::default();
        let r = Record::from_json_row(
            &row(json!({
                "primary_type": "THEFT",
                "date": "2024-03-10T08:00:00.000",
                "latitude": "41.9",
                "longitude": "-87.7"
            })),
            &fields,
        )
        .unwrap();
        assert_eq!(r.category, "THEFT");
        assert_eq!(r.latitude, 41.9);
        assert_eq!(r.longitude, -87.7);
    }

    #[test]
    fn test_from_json_row_drops_malformed() {
        let fields = FieldMap::default();
        let missing_date = row(json!({"primary_type": "THEFT", "latitude": "41.9", "longitude": "-87.7"}));
        let null_lat = row(json!({"primary_type": "THEFT", "date": "2024-03-10", "latitude": null, "longitude": "-87.7"}));
        let bad_lon = row(json!({"primary_type": "THEFT", "date": "2024-03-10", "latitude": "41.9", "longitude": "abc"}));
        assert!(Record::from_json_row(&missing_date, &fields).is_none());
        assert!(Record::from_json_row(&null_lat, &fields).is_none());
        assert!(Record::from_json_row(&bad_lon, &fields).is_none());
    }

    #[test]
    fn test_missing_category_kept_as_empty() {
        let fields = FieldMap::default();
        let r = Record::from_json_row(
            &row(json!({"date": "2024-03-10", "latitude": 41.9, "longitude": -87.7})),
            &fields,
        )
        .unwrap();
        assert_eq!(r.category, "");
    }

    #[test]
    fn test_select_list() {
        assert_eq!(
            FieldMap::default().select_list(),
            "primary_type,date,latitude,longitude"
        );
    }
}
