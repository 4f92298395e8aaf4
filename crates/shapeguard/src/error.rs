//! Typed adapter over validation message lists.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal error structure for JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
    details: Vec<String>,
}

/// Wrapper for the error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

/// A failed validation, carrying the messages the schema produced.
///
/// Serializes to:
///
/// ```json
/// {
///   "error": {
///     "type": "validation_error",
///     "message": "Validation failed",
///     "details": ["key \"id\" not found"]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Messages in the order the schema reported them
    pub details: Vec<String>,
    /// Summary message (default: "Validation failed")
    pub message: String,
}

impl ValidationError {
    pub fn new(details: Vec<String>) -> Self {
        Self {
            details,
            message: "Validation failed".to_string(),
        }
    }

    /// Create a validation error with a custom summary.
    pub fn with_message(details: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            details,
            message: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    /// The value was well-formed but semantically invalid.
    pub fn status(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} error(s)", self.message, self.details.len())
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let wrapper = ErrorWrapper {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: self.message.clone(),
                details: self.details.clone(),
            },
        };
        wrapper.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidationError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wrapper = ErrorWrapper::deserialize(deserializer)?;
        Ok(Self {
            details: wrapper.error.details,
            message: wrapper.error.message,
        })
    }
}
