//! Dashboard configuration file
//!
//! Holds the data source and the initial control values. Filter state is
//! deliberately absent: selections never outlive a session.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::constants::config::{CONFIG_ENV, CONFIG_FILE};
use crate::constants::controls::{DEFAULT_DATA_LIMIT, DEFAULT_TOP_N};
use crate::constants::preview::DEFAULT_ROWS;
use crate::constants::source::DEFAULT_ENDPOINT;
use crate::data::FieldMap;
use crate::error::{ExplorerError, Result};
use crate::state::{Controls, TimeGranularity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// SODA JSON endpoint
    pub endpoint: String,
    pub fields: FieldMap,
    pub top_n: usize,
    pub granularity: TimeGranularity,
    pub data_limit: usize,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fields: FieldMap::default(),
            top_n: DEFAULT_TOP_N,
            granularity: TimeGranularity::default(),
            data_limit: DEFAULT_DATA_LIMIT,
            preview_rows: DEFAULT_ROWS,
        }
    }
}

impl DashboardConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        if config.endpoint.trim().is_empty() {
            return Err(ExplorerError::Config("endpoint must not be empty".into()));
        }
        Ok(config)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Startup lookup: `$CRIMESCOPE_CONFIG`, then `crimescope.json` in the
    /// working directory, then defaults
    pub fn discover() -> Self {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::discover_from(from_env, Path::new(CONFIG_FILE))
    }

    fn discover_from(explicit: Option<PathBuf>, local: &Path) -> Self {
        let path = match explicit {
            Some(path) => path,
            None if local.exists() => local.to_path_buf(),
            None => return Self::default(),
        };
        match Self::read(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring configuration {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Initial control values, clamped to what the controls offer
    pub fn controls(&self) -> Controls {
        let mut controls = Controls {
            top_n: self.top_n,
            granularity: self.granularity,
            data_limit: self.data_limit,
        };
        controls.validate();
        controls
    }

    /// Take over the current control values
    pub fn store_controls(&mut self, controls: &Controls) {
        self.top_n = controls.top_n;
        self.granularity = controls.granularity;
        self.data_limit = controls.data_limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_read_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let mut config = DashboardConfig::default();
        config.top_n = 25;
        config.granularity = TimeGranularity::Weekly;
        config.write(file.path()).unwrap();

        let read = DashboardConfig::read(file.path()).unwrap();
        assert_eq!(read, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "granularity": "yearly", "data_limit": 5000 }}"#).unwrap();
        file.flush().unwrap();

        let config = DashboardConfig::read(file.path()).unwrap();
        assert_eq!(config.granularity, TimeGranularity::Yearly);
        assert_eq!(config.data_limit, 5000);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.fields, FieldMap::default());
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "endpoint": " " }}"#).unwrap();
        file.flush().unwrap();
        assert!(matches!(
            DashboardConfig::read(file.path()),
            Err(ExplorerError::Config(_))
        ));
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("crimescope.json");
        assert_eq!(DashboardConfig::discover_from(None, &missing), DashboardConfig::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(
            DashboardConfig::discover_from(Some(broken), &missing),
            DashboardConfig::default()
        );
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("crimescope.json");
        let explicit = dir.path().join("other.json");
        DashboardConfig {
            top_n: 5,
            ..Default::default()
        }
        .write(&local)
        .unwrap();
        DashboardConfig {
            top_n: 30,
            ..Default::default()
        }
        .write(&explicit)
        .unwrap();

        assert_eq!(DashboardConfig::discover_from(None, &local).top_n, 5);
        assert_eq!(DashboardConfig::discover_from(Some(explicit), &local).top_n, 30);
    }

    #[test]
    fn test_controls_are_clamped() {
        let config = DashboardConfig {
            data_limit: 1_000_000,
            ..Default::default()
        };
        assert_eq!(config.controls().data_limit, 100_000);
    }
}
