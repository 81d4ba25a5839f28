//! UI status state

/// Lifecycle of the most recent retrieval
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading {
        source: String,
    },
    Loaded,
    Failed {
        message: String,
    },
}

/// Status line and transient messages
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub status: LoadStatus,

    /// Error message to display in UI (config I/O, clipboard)
    pub error_message: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_loading(&mut self, source: impl Into<String>) {
        self.status = LoadStatus::Loading {
            source: source.into(),
        };
    }

    /// Call after installing new data
    pub fn on_data_loaded(&mut self) {
        self.status = LoadStatus::Loaded;
    }

    pub fn on_load_failed(&mut self, message: impl Into<String>) {
        self.status = LoadStatus::Failed {
            message: message.into(),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading { .. })
    }

    /// Status line text; `summary` is shown once data is in
    pub fn status_text(&self, summary: &str) -> String {
        match &self.status {
            LoadStatus::Loading { .. } => "Loading…".to_string(),
            LoadStatus::Failed { message } => format!("Load failed: {}", message),
            LoadStatus::Idle | LoadStatus::Loaded => summary.to_string(),
        }
    }

    /// Set an error message
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Clear the current error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
