//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for funnelmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid stage catalog definitions
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record source errors (snapshot loading, filtering)
    #[error("Record source error: {message}")]
    RecordSource {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a record source error with path context
    pub fn record_source(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::RecordSource {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Validation failure for a single opportunity record.
///
/// Malformed records are rejected one at a time and reported alongside the
/// aggregates rather than aborting the whole pass; these errors ride in a
/// [`RecordIntake`](crate::core::RecordIntake) so callers can count or log
/// them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record {id:?}: missing close date")]
    MissingCloseDate { id: String },

    #[error("record {id:?}: unparseable close date {value:?}")]
    InvalidCloseDate { id: String, value: String },

    #[error("record {id:?}: missing stage name")]
    MissingStageName { id: String },
}

impl RecordError {
    /// Identifier of the record that failed validation.
    pub fn record_id(&self) -> &str {
        match self {
            Self::MissingCloseDate { id }
            | Self::InvalidCloseDate { id, .. }
            | Self::MissingStageName { id } => id,
        }
    }
}
