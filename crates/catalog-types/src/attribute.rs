//! Document-store attribute values.
//!
//! The serde representation matches the store's JSON wire format, so stream
//! batches deserialize straight into these types:
//!
//! ```json
//! {"id": {"S": "p1"}, "price": {"N": "10.5"}, "image_labels": {"L": [...]}}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Number, RecordError};

/// A single record as returned by the document store: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// One attribute value in the document store's type system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String
    #[serde(rename = "S")]
    S(String),
    /// Number, kept as its decimal text to avoid losing precision
    #[serde(rename = "N")]
    N(String),
    /// Boolean
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Null marker
    #[serde(rename = "NULL")]
    Null(bool),
    /// Heterogeneous list
    #[serde(rename = "L")]
    L(Vec<AttributeValue>),
    /// Nested map
    #[serde(rename = "M")]
    M(HashMap<String, AttributeValue>),
    /// String set
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// Number set
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// Binary, base64 encoded
    #[serde(rename = "B")]
    B(String),
    /// Binary set, base64 encoded
    #[serde(rename = "BS")]
    Bs(Vec<String>),
}

impl AttributeValue {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "string",
            AttributeValue::N(_) => "number",
            AttributeValue::Bool(_) => "boolean",
            AttributeValue::Null(_) => "null",
            AttributeValue::L(_) => "list",
            AttributeValue::M(_) => "map",
            AttributeValue::Ss(_) => "string set",
            AttributeValue::Ns(_) => "number set",
            AttributeValue::B(_) => "binary",
            AttributeValue::Bs(_) => "binary set",
        }
    }

    pub fn as_str(&self, field: &str) -> Result<&str, RecordError> {
        match self {
            AttributeValue::S(s) => Ok(s),
            other => Err(RecordError::wrong_type(field, "string", other.kind())),
        }
    }

    /// Parse a number attribute, see [`Number::parse`].
    pub fn as_number(&self, field: &str) -> Result<Number, RecordError> {
        match self {
            AttributeValue::N(text) => {
                Number::parse(text).ok_or_else(|| RecordError::InvalidNumber {
                    field: field.to_string(),
                    value: text.clone(),
                })
            }
            other => Err(RecordError::wrong_type(field, "number", other.kind())),
        }
    }

    pub fn as_list(&self, field: &str) -> Result<&[AttributeValue], RecordError> {
        match self {
            AttributeValue::L(values) => Ok(values),
            other => Err(RecordError::wrong_type(field, "list", other.kind())),
        }
    }

    pub fn as_map(&self, field: &str) -> Result<&HashMap<String, AttributeValue>, RecordError> {
        match self {
            AttributeValue::M(map) => Ok(map),
            other => Err(RecordError::wrong_type(field, "map", other.kind())),
        }
    }
}
