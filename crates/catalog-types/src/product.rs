//! Decoded product records.

use crate::{AttributeValue, Item, Number, RecordError};

/// Image labels are kept only when their confidence is strictly above this value.
pub const LABEL_CONFIDENCE_THRESHOLD: f64 = 75.0;

/// An image-classification label attached to a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLabel {
    pub name: String,
    /// Confidence score, 0-100
    pub confidence: Number,
}

impl ImageLabel {
    pub fn is_confident(&self) -> bool {
        self.confidence.as_f64() > LABEL_CONFIDENCE_THRESHOLD
    }
}

/// A product record decoded from the document store.
///
/// Only the tracked fields are decoded; bookkeeping attributes such as
/// `sk`, `url` and `aliases` are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub style: String,
    pub current_stock: Option<Number>,
    pub price: Option<Number>,
    pub gender_affinity: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub featured: Option<bool>,
    pub image_labels: Vec<ImageLabel>,
}

impl Product {
    /// Decode a product from a document-store item.
    pub fn from_item(item: &Item) -> Result<Self, RecordError> {
        Ok(Product {
            id: required_str(item, "id")?,
            name: required_str(item, "name")?,
            category: required_str(item, "category")?,
            style: required_str(item, "style")?,
            current_stock: optional_number(item, "current_stock")?,
            price: optional_number(item, "price")?,
            gender_affinity: optional_str(item, "gender_affinity")?,
            image: optional_str(item, "image")?,
            description: optional_str(item, "description")?,
            featured: optional_flag(item, "featured")?,
            image_labels: image_labels(item)?,
        })
    }

    /// Lower-cased names of the labels above the confidence threshold, in list order.
    pub fn confident_labels(&self) -> impl Iterator<Item = String> + '_ {
        self.image_labels
            .iter()
            .filter(|label| label.is_confident())
            .map(|label| label.name.to_lowercase())
    }
}

/// Best-effort id lookup for error reporting on records that fail to decode.
pub fn item_id(item: &Item) -> Option<&str> {
    match item.get("id") {
        Some(AttributeValue::S(id)) => Some(id),
        _ => None,
    }
}

fn present<'a>(item: &'a Item, field: &str) -> Option<&'a AttributeValue> {
    match item.get(field) {
        None | Some(AttributeValue::Null(_)) => None,
        Some(value) => Some(value),
    }
}

fn required_str(item: &Item, field: &str) -> Result<String, RecordError> {
    present(item, field)
        .ok_or_else(|| RecordError::missing(field))?
        .as_str(field)
        .map(str::to_string)
}

fn optional_str(item: &Item, field: &str) -> Result<Option<String>, RecordError> {
    present(item, field)
        .map(|value| value.as_str(field).map(str::to_string))
        .transpose()
}

fn optional_number(item: &Item, field: &str) -> Result<Option<Number>, RecordError> {
    present(item, field)
        .map(|value| value.as_number(field))
        .transpose()
}

// The catalog stores the flag either as a boolean or as the strings "true"/"false".
fn optional_flag(item: &Item, field: &str) -> Result<Option<bool>, RecordError> {
    match present(item, field) {
        None => Ok(None),
        Some(AttributeValue::Bool(b)) => Ok(Some(*b)),
        Some(AttributeValue::S(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(AttributeValue::S(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(AttributeValue::S(_)) => Err(RecordError::wrong_type(
            field,
            "boolean or \"true\"/\"false\"",
            "string",
        )),
        Some(other) => Err(RecordError::wrong_type(field, "boolean", other.kind())),
    }
}

fn image_labels(item: &Item) -> Result<Vec<ImageLabel>, RecordError> {
    let Some(value) = present(item, "image_labels") else {
        return Ok(Vec::new());
    };

    value
        .as_list("image_labels")?
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let field = format!("image_labels[{i}]");
            let map = entry.as_map(&field)?;
            let name_field = format!("{field}.name");
            let confidence_field = format!("{field}.confidence");
            let name = map
                .get("name")
                .ok_or_else(|| RecordError::missing(&name_field))?
                .as_str(&name_field)?
                .to_string();
            let confidence = map
                .get("confidence")
                .ok_or_else(|| RecordError::missing(&confidence_field))?
                .as_number(&confidence_field)?;
            Ok(ImageLabel { name, confidence })
        })
        .collect()
}
