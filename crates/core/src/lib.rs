//! Shared primitives for all Rust crates in groupbind.

#![forbid(unsafe_code)]

/// Authentication capability primitives.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::AuthMode;

/// Result type used across groupbind crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Creates a validated non-empty string, naming the field on failure.
    pub fn for_field(field: &str, value: impl Into<String>) -> AppResult<Self> {
        Self::new(value)
            .map_err(|_| AppError::Validation(format!("{field} must not be empty or whitespace")))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested remote resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing remote state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The configured authentication mode cannot perform the operation.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Remote system rejected the credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Remote system answered with an unexpected failure.
    #[error("remote error: {0}")]
    Remote(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true when the error reports a missing remote resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn field_validation_names_the_field() {
        let result = NonEmptyString::for_field("group_slug", "");
        assert!(
            matches!(result, Err(AppError::Validation(message)) if message.contains("group_slug"))
        );
    }

    #[test]
    fn not_found_is_detected() {
        assert!(AppError::NotFound("membership".to_owned()).is_not_found());
        assert!(!AppError::Remote("boom".to_owned()).is_not_found());
    }
}
