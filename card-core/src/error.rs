//! Error types for card operations.

use thiserror::Error;

use crate::schema::FieldError;

/// Result type for card operations.
pub type CardResult<T> = Result<T, CardError>;

/// Errors that can occur around a card.
///
/// Rendering and interaction never fail; these come from loading
/// configuration and from validating dialog submissions.
#[derive(Debug, Error)]
pub enum CardError {
    /// Configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A submission was rejected by a validation schema.
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CardError {
    /// Field errors carried by a validation failure, empty otherwise.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}
