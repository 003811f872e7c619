//! Error types for record decoding.

use thiserror::Error;

/// Errors that can occur while decoding a document-store record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A required attribute is absent
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// An attribute holds a different kind of value than expected
    #[error("field '{field}' should be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A number attribute is not a finite number
    #[error("field '{field}' holds an invalid number: {value:?}")]
    InvalidNumber { field: String, value: String },
}

impl RecordError {
    pub fn missing(field: impl Into<String>) -> Self {
        RecordError::MissingField {
            field: field.into(),
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        RecordError::WrongType {
            field: field.into(),
            expected,
            found,
        }
    }
}
