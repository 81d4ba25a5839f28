//! Error types for CrimeScope
//!
//! Every failure that can surface to the analyst is a load failure of some
//! kind; malformed rows and empty selections are not errors and never reach
//! this type.

use thiserror::Error;

/// Main error type for CrimeScope operations
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Transport-level HTTP failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the dataset endpoint
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Column not found in data
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background loader went away before answering
    #[error("Background loader stopped")]
    WorkerGone,
}

/// Result type alias for CrimeScope operations
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// UI-friendly error message formatting
impl ExplorerError {
    /// Get a user-friendly error message suitable for the status line
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::FileIo(e) => format!("File error: {}", e),
            ExplorerError::Http(e) => format!("Network error: {}", e),
            ExplorerError::HttpStatus { status } => format!("HTTP {}", status),
            ExplorerError::Polars(e) => format!("Data error: {}", e),
            ExplorerError::Json(e) => format!("Malformed response: {}", e),
            ExplorerError::UnsupportedFormat { extension } => {
                format!("Unsupported file format: '.{}'", extension)
            }
            ExplorerError::ColumnNotFound { column } => {
                format!("Column '{}' not found", column)
            }
            ExplorerError::Config(msg) => format!("Config error: {}", msg),
            ExplorerError::WorkerGone => "Loader unavailable".to_string(),
        }
    }

    /// Get a short title for the error
    pub fn title(&self) -> &'static str {
        match self {
            ExplorerError::FileIo(_) => "File Error",
            ExplorerError::Http(_) | ExplorerError::HttpStatus { .. } => "Network Error",
            ExplorerError::Polars(_) => "Data Error",
            ExplorerError::Json(_) => "JSON Error",
            ExplorerError::UnsupportedFormat { .. } => "Unsupported Format",
            ExplorerError::ColumnNotFound { .. } => "Column Not Found",
            ExplorerError::Config(_) => "Configuration Error",
            ExplorerError::WorkerGone => "Loader Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExplorerError::HttpStatus { status: 503 };
        assert_eq!(err.user_message(), "HTTP 503");
        assert_eq!(err.title(), "Network Error");

        let err = ExplorerError::ColumnNotFound {
            column: "primary_type".to_string(),
        };
        assert_eq!(err.user_message(), "Column 'primary_type' not found");
        assert_eq!(err.title(), "Column Not Found");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExplorerError = io_err.into();
        assert!(matches!(err, ExplorerError::FileIo(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ExplorerError = json_err.into();
        assert!(matches!(err, ExplorerError::Json(_)));
    }
}
