//! Typed errors for the job tracker library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::time::Duration;

use thiserror::Error;

use crate::types::application::ApplicationId;

/// Errors that can occur in extraction, relay, storage and export operations.
///
/// Absence is never an error here: a stale relay entry, a missing DOM match or
/// deleting an unknown id all resolve to `None`/empty/no-op instead.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A configured CSS selector does not parse
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A configured pattern does not compile
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Record id already present in the store
    #[error("application {0} already exists")]
    DuplicateId(ApplicationId),

    /// Export requested with zero records
    #[error("no applications to export")]
    NothingToExport,

    /// Key-value backend failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The receiving context is gone or dropped the reply
    #[error("message transport error: {0}")]
    Transport(String),

    /// No reply arrived in time
    #[error("request `{action}` timed out after {timeout:?}")]
    Timeout { action: String, timeout: Duration },

    /// The responder does not serve this action
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),
}

impl TrackerError {
    /// Wrap any backend failure as a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
