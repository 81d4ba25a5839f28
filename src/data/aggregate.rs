//! Counting and binning over record sets
//!
//! The only aggregation the views need: per-category counts for the ranking
//! and calendar-aligned time bins for the histogram.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use super::record::Record;
use crate::state::TimeGranularity;

/// One ranked category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Top `top_n` categories by count, descending. Equal counts keep the order
/// in which the categories were first encountered.
pub fn rank_categories<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    top_n: usize,
) -> Vec<CategoryCount> {
    profiling::scope!("rank_categories");

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for r in records {
        match index.get(r.category.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(r.category.as_str(), counts.len());
                counts.push(CategoryCount {
                    category: r.category.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

/// Half-open bin `[start, end)`; the last bin of a histogram also holds `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBin {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: usize,
}

/// Calendar boundaries strictly inside `(start, end)`
pub fn calendar_thresholds(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: TimeGranularity,
) -> Vec<DateTime<Utc>> {
    let mut thresholds = Vec::new();
    let mut date = floor_to_boundary(start.date_naive(), granularity);
    loop {
        let Some(boundary) = midnight(date) else {
            break;
        };
        if boundary >= end {
            break;
        }
        if boundary > start {
            thresholds.push(boundary);
        }
        match next_boundary(date, granularity) {
            Some(next) => date = next,
            None => break,
        }
    }
    thresholds
}

/// `[start, end]` widened outward to whole calendar units. The result is
/// never empty: a single instant spans one unit.
pub fn nice_time_domain(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: TimeGranularity,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let lo = midnight(floor_to_boundary(start.date_naive(), granularity)).unwrap_or(start);
    let hi_date = floor_to_boundary(end.date_naive(), granularity);
    let mut hi = midnight(hi_date).unwrap_or(end);
    if hi < end || hi <= lo {
        hi = next_boundary(hi_date, granularity)
            .and_then(midnight)
            .unwrap_or(end);
    }
    (lo, hi)
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

fn floor_to_boundary(date: NaiveDate, granularity: TimeGranularity) -> NaiveDate {
    match granularity {
        // Weeks start on Sunday
        TimeGranularity::Weekly => {
            date - Duration::days(date.weekday().num_days_from_sunday() as i64)
        }
        TimeGranularity::Monthly => date.with_day(1).unwrap_or(date),
        TimeGranularity::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

fn next_boundary(date: NaiveDate, granularity: TimeGranularity) -> Option<NaiveDate> {
    match granularity {
        TimeGranularity::Weekly => date.checked_add_signed(Duration::days(7)),
        TimeGranularity::Monthly => {
            let (y, m) = if date.month() == 12 {
                (date.year() + 1, 1)
            } else {
                (date.year(), date.month() + 1)
            };
            NaiveDate::from_ymd_opt(y, m, 1)
        }
        TimeGranularity::Yearly => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1),
    }
}

/// Bin timestamps over the fixed domain `[start, end]`. Values outside the
/// domain are ignored.
pub fn time_histogram(
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: TimeGranularity,
) -> Vec<TimeBin> {
    profiling::scope!("time_histogram");

    let thresholds = calendar_thresholds(start, end, granularity);
    let mut bins: Vec<TimeBin> = std::iter::once(start)
        .chain(thresholds.iter().copied())
        .zip(thresholds.iter().copied().chain(std::iter::once(end)))
        .map(|(start, end)| TimeBin {
            start,
            end,
            count: 0,
        })
        .collect();

    for t in timestamps {
        if t < start || t > end {
            continue;
        }
        let idx = thresholds.partition_point(|th| *th <= t);
        bins[idx].count += 1;
    }
    bins
}
