//! Core error type.
//!
//! Every adapter crate maps its failures into `CoreError` so the session
//! components can handle all of them at one boundary.

use thiserror::Error;

/// Core layer error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON serialization/deserialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),

    /// Field validation failure
    #[error("validation failed: {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Reason
        message: String,
    },

    /// Camera access was refused by the user or the OS
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// No usable camera device (missing, busy, or failed to open)
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// Snapshot requested without an active camera session
    #[error("no active camera session")]
    SessionInactive,

    /// Image decoding/encoding failure
    #[error("image encoding error: {0}")]
    Encoding(String),

    /// Transport failure (connection refused, timeout, unreadable body)
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered `success: false`
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// Rate limit exceeded (429)
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Service temporarily unavailable (503)
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Resource kind (e.g. "API")
        resource_type: String,
        /// Resource identifier
        id: String,
    },

    /// Unexpected condition
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Camera acquisition failures keep the owning component in its
    /// pre-start state.
    pub fn is_camera_error(&self) -> bool {
        matches!(
            self,
            CoreError::PermissionDenied(_) | CoreError::DeviceUnavailable(_)
        )
    }
}
