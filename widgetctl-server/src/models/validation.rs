//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent or empty
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value has the wrong shape (e.g., "yes" for a boolean)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value parses but falls outside what the store can hold
    OutOfRange { field: &'static str, reason: &'static str },

    /// Request body could not be decoded
    Body { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} must be specified", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "incorrect {} format: {}", field, reason)
            }
            Self::OutOfRange { field, reason } => {
                write!(f, "{} out of range: {}", field, reason)
            }
            Self::Body { reason } => write!(f, "invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Require a non-blank string no longer than `max` characters.
///
/// Leading and trailing whitespace is not stripped from the stored value;
/// it only decides whether the field counts as empty.
pub(crate) fn require_text(
    field: &'static str,
    value: Option<&str>,
    max: Option<usize>,
) -> Result<String, ValidationError> {
    let value = value.unwrap_or_default();
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }
    Ok(value.to_owned())
}
