//! Analyst-adjustable parameters

use serde::{Deserialize, Serialize};

use crate::constants::controls::*;

/// Histogram bin width and axis tick format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl TimeGranularity {
    pub const ALL: [TimeGranularity; 3] = [
        TimeGranularity::Weekly,
        TimeGranularity::Monthly,
        TimeGranularity::Yearly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeGranularity::Weekly => "Weekly",
            TimeGranularity::Monthly => "Monthly",
            TimeGranularity::Yearly => "Yearly",
        }
    }

    /// chrono format string for axis ticks
    pub fn tick_format(&self) -> &'static str {
        match self {
            TimeGranularity::Weekly => "%b %d",
            TimeGranularity::Monthly => "%b %y",
            TimeGranularity::Yearly => "%Y",
        }
    }

    /// Upper bound on labelled axis ticks
    pub fn tick_count(&self) -> usize {
        match self {
            TimeGranularity::Weekly => 8,
            TimeGranularity::Monthly | TimeGranularity::Yearly => 6,
        }
    }
}

/// Control surface values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Ranked categories shown in the bar chart
    pub top_n: usize,

    /// Histogram bin width
    pub granularity: TimeGranularity,

    /// Row cap applied on the next reload
    pub data_limit: usize,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            granularity: TimeGranularity::default(),
            data_limit: DEFAULT_DATA_LIMIT,
        }
    }
}

impl Controls {
    /// Clamp values into the ranges the control surface offers
    pub fn validate(&mut self) {
        self.top_n = self.top_n.max(1);
        self.data_limit = self.data_limit.clamp(MIN_DATA_LIMIT, MAX_DATA_LIMIT);
    }
}
