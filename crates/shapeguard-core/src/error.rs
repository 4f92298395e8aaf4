//! Construction-time error type.
//!
//! Validation failures are never errors: they come back as message lists.
//! [`SchemaError`] is raised only while a schema is being built, when a
//! modifier receives an argument it cannot use.

use http::StatusCode;
use thiserror::Error;

/// Result type alias for schema construction.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// Misuse of the builder API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A modifier received an unusable argument (unparsable date bound,
    /// invalid regex, zero step, ...).
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl SchemaError {
    /// Create an invalid-configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(%message, "rejected schema configuration");
        Self::InvalidConfiguration { message }
    }

    /// The error is always the caller's fault.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Stable classification code.
    pub fn code(&self) -> &'static str {
        "bad_request"
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidConfiguration { message } => message,
        }
    }
}
