use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote store unavailable: {message}")]
    RemoteUnavailable { message: String },

    #[error("Local cache failure: {message}")]
    CacheIo { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Refresh of {scope} was cancelled")]
    Cancelled { scope: String },

    #[error("No signed-in user")]
    NotSignedIn,

    #[error("Invalid serving count: {value} (must be at least 1)")]
    InvalidServings { value: u32 },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::RemoteUnavailable {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Remote,
    Cache,
    Input,
    Configuration,
    Cancellation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn remote(message: impl Into<String>) -> Self {
        SyncError::RemoteUnavailable {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        SyncError::CacheIo {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::RemoteUnavailable { .. } => ErrorCategory::Remote,
            SyncError::CacheIo { .. }
            | SyncError::IoError(_)
            | SyncError::SerializationError(_) => ErrorCategory::Cache,
            SyncError::Cancelled { .. } => ErrorCategory::Cancellation,
            SyncError::NotSignedIn | SyncError::InvalidServings { .. } => ErrorCategory::Input,
            SyncError::ConfigValidationError { .. } | SyncError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Cancellation => ErrorSeverity::Low,
            // 網路問題通常可以稍後重試
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Cache | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, SyncError::RemoteUnavailable { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::RemoteUnavailable { .. } => {
                "Check the network connection; cached data is still available without --refresh"
            }
            SyncError::CacheIo { .. } | SyncError::IoError(_) => {
                "Check that the cache directory exists and is writable"
            }
            SyncError::SerializationError(_) => {
                "The cache file may be corrupted; delete it to force a fresh download"
            }
            SyncError::Cancelled { .. } => "The request was abandoned; run it again if needed",
            SyncError::NotSignedIn => "Pass --user or set session.user_id in the config file",
            SyncError::InvalidServings { .. } => "Use a serving count of 1 or more",
            SyncError::ConfigValidationError { .. } | SyncError::InvalidConfigValueError { .. } => {
                "Review the configuration file against recipe-sync.example.toml"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SyncError::RemoteUnavailable { .. } => {
                "Could not reach the recipe server.".to_string()
            }
            SyncError::CacheIo { .. }
            | SyncError::IoError(_)
            | SyncError::SerializationError(_) => "Could not read or write the local cache.".to_string(),
            SyncError::Cancelled { .. } => "The request was cancelled.".to_string(),
            SyncError::NotSignedIn => "You need to be signed in for this.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
