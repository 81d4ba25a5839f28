//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the application, making them easier to maintain and configure.

/// Dataset source defaults
pub mod source {
    /// Chicago crimes dataset (Socrata JSON endpoint)
    pub const DEFAULT_ENDPOINT: &str = "https://data.cityofchicago.org/resource/ijzp-q8t2.json";

    pub const CATEGORY_FIELD: &str = "primary_type";
    pub const TIMESTAMP_FIELD: &str = "date";
    pub const LATITUDE_FIELD: &str = "latitude";
    pub const LONGITUDE_FIELD: &str = "longitude";

    /// HTTP request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

/// Control surface defaults and limits
pub mod controls {
    /// Default number of ranked categories shown
    pub const DEFAULT_TOP_N: usize = 15;

    /// Selectable ranked-category counts
    pub const TOP_N_CHOICES: [usize; 6] = [5, 10, 15, 20, 25, 30];

    /// Default row cap for the next reload
    pub const DEFAULT_DATA_LIMIT: usize = 50_000;

    pub const MIN_DATA_LIMIT: usize = 1_000;
    pub const MAX_DATA_LIMIT: usize = 100_000;
    pub const DATA_LIMIT_STEP: f64 = 1_000.0;
}

/// Gesture thresholds
pub mod brush {
    /// Area brush commits only when both sides exceed this many pixels
    pub const AREA_COMMIT_THRESHOLD_PX: f32 = 2.0;
}

/// Scatter canvas layout
pub mod scatter {
    pub const MARGIN_TOP: f32 = 20.0;
    pub const MARGIN_RIGHT: f32 = 20.0;
    pub const MARGIN_BOTTOM: f32 = 40.0;
    pub const MARGIN_LEFT: f32 = 50.0;

    /// Point radius in pixels
    pub const POINT_RADIUS: f32 = 1.0;

    /// Approximate tick count per axis
    pub const TICK_COUNT: usize = 5;
}

/// Preview table defaults
pub mod preview {
    /// Rows of the filtered set shown in the preview table
    pub const DEFAULT_ROWS: usize = 10;

    /// Placeholder shown when the filtered set is empty
    pub const NO_DATA: &str = "No data to display";

    /// Placeholder for missing cell values
    pub const MISSING: &str = "N/A";
}

/// UI layout defaults
pub mod layout {
    /// Height of the time histogram panel
    pub const HISTOGRAM_HEIGHT: f32 = 220.0;

    /// Width of the category ranking panel
    pub const CATEGORY_PANEL_WIDTH: f32 = 360.0;

    /// Height of the preview table panel
    pub const PREVIEW_PANEL_HEIGHT: f32 = 260.0;

    /// Table row height
    pub const TABLE_ROW_HEIGHT: f32 = 18.0;

    /// Table header row height
    pub const TABLE_HEADER_HEIGHT: f32 = 20.0;
}

/// Configuration file paths
pub mod config {
    /// Configuration file name looked up in the working directory
    pub const CONFIG_FILE: &str = "crimescope.json";

    /// Environment variable overriding the configuration path
    pub const CONFIG_ENV: &str = "CRIMESCOPE_CONFIG";
}
