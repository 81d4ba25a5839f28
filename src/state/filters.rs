//! Conjunctive filter state over the loaded records
//!
//! Three independent predicates combined by AND. The filtered set is never
//! patched incrementally: [`FilterState::apply`] rebuilds it from the raw
//! records every time.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::data::Record;

/// Inclusive time window, always stored with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build from two instants in either order
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Inclusive longitude/latitude box, always stored with `min <= max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl SpatialBounds {
    pub fn new(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> Self {
        Self {
            min_lon: lon_a.min(lon_b),
            min_lat: lat_a.min(lat_b),
            max_lon: lon_a.max(lon_b),
            max_lat: lat_a.max(lat_b),
        }
    }

    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        longitude >= self.min_lon
            && longitude <= self.max_lon
            && latitude >= self.min_lat
            && latitude <= self.max_lat
    }
}

/// The three filter predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Time window; None passes everything
    time_range: Option<TimeRange>,

    /// Category allow-list; empty passes everything
    categories: HashSet<String>,

    /// Spatial box; None passes everything
    spatial_bounds: Option<SpatialBounds>,
}

impl FilterState {
    /// Create an all-open filter state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        self.time_range
    }

    pub fn category_selection(&self) -> &HashSet<String> {
        &self.categories
    }

    pub fn spatial_bounds(&self) -> Option<SpatialBounds> {
        self.spatial_bounds
    }

    pub fn is_category_selected(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn set_time_range(&mut self, range: Option<TimeRange>) {
        self.time_range = range;
    }

    /// Flip membership of `category` in the allow-list.
    /// Returns true if the category is selected afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.categories.remove(category) {
            false
        } else {
            self.categories.insert(category.to_string());
            true
        }
    }

    pub fn set_spatial_bounds(&mut self, bounds: Option<SpatialBounds>) {
        self.spatial_bounds = bounds;
    }

    /// Clear all three predicates
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if any predicate restricts
    pub fn is_active(&self) -> bool {
        self.time_range.is_some() || !self.categories.is_empty() || self.spatial_bounds.is_some()
    }

    /// Conjunction of the three predicates for one record
    pub fn matches(&self, record: &Record) -> bool {
        let in_time = self
            .time_range
            .is_none_or(|range| range.contains(record.timestamp));
        let in_categories = self.categories.is_empty() || self.categories.contains(&record.category);
        let in_bounds = self
            .spatial_bounds
            .is_none_or(|b| b.contains(record.longitude, record.latitude));
        in_time && in_categories && in_bounds
    }

    /// Indices into `raw` of every matching record, in `raw` order
    pub fn apply(&self, raw: &[Record]) -> Vec<usize> {
        profiling::scope!("apply_filters");

        raw.iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect()
    }
}
