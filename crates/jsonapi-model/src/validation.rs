use thiserror::Error;

/// Validation errors for model primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a numeric value is outside its allowed range.
    #[error("{field} ({value}) is out of bounds")]
    OutOfBounds {
        /// Field name that is out of bounds.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a collection that must hold at least one element is empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Field name that was empty.
        field: &'static str,
    },
}
