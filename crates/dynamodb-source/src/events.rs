//! Stream batch decoding.
//!
//! A batch is the JSON document the stream delivers to its consumer:
//!
//! ```json
//! {"Records": [
//!   {"eventName": "INSERT", "dynamodb": {"Keys": {...}, "NewImage": {...}}},
//!   {"eventName": "REMOVE", "dynamodb": {"Keys": {"id": {"S": "p1"}}}}
//! ]}
//! ```

use std::io::Read;

use catalog_types::{AttributeValue, Item};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while decoding a stream batch.
#[derive(Error, Debug)]
pub enum EventError {
    /// The batch is not valid JSON or does not have the stream record shape
    #[error("invalid stream batch: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record {index}: unknown event name '{name}'")]
    UnknownEventName { index: usize, name: String },

    /// INSERT and MODIFY records must carry the new image
    #[error("record {index}: {event_name} event has no NewImage")]
    MissingImage { index: usize, event_name: String },

    /// REMOVE records must identify the removed item
    #[error("record {index}: REMOVE event has no 'id' key")]
    MissingKey { index: usize },
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamBatch {
    #[serde(rename = "Records")]
    pub records: Vec<StreamRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "eventName")]
    pub event_name: String,
    pub dynamodb: StreamPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamPayload {
    #[serde(default)]
    pub keys: Item,
    #[serde(default)]
    pub new_image: Option<Item>,
    #[serde(default)]
    pub old_image: Option<Item>,
}

/// One change to the products table.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Insert(Item),
    Modify(Item),
    Remove { id: String },
}

impl ChangeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::Insert(_) => "INSERT",
            ChangeEvent::Modify(_) => "MODIFY",
            ChangeEvent::Remove { .. } => "REMOVE",
        }
    }
}

impl StreamBatch {
    /// Convert the records into change events, preserving their order.
    pub fn into_events(self) -> Result<Vec<ChangeEvent>, EventError> {
        self.records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_event(index))
            .collect()
    }
}

impl StreamRecord {
    fn into_event(self, index: usize) -> Result<ChangeEvent, EventError> {
        let StreamPayload {
            keys,
            new_image,
            old_image,
            ..
        } = self.dynamodb;

        match self.event_name.as_str() {
            "INSERT" | "MODIFY" => {
                let image = new_image.ok_or_else(|| EventError::MissingImage {
                    index,
                    event_name: self.event_name.clone(),
                })?;
                if self.event_name == "INSERT" {
                    Ok(ChangeEvent::Insert(image))
                } else {
                    Ok(ChangeEvent::Modify(image))
                }
            }
            "REMOVE" => {
                let id = key_id(&keys)
                    .or_else(|| old_image.as_ref().and_then(key_id))
                    .ok_or(EventError::MissingKey { index })?;
                Ok(ChangeEvent::Remove { id })
            }
            _ => Err(EventError::UnknownEventName {
                index,
                name: self.event_name,
            }),
        }
    }
}

fn key_id(item: &Item) -> Option<String> {
    match item.get("id") {
        Some(AttributeValue::S(id)) | Some(AttributeValue::N(id)) => Some(id.clone()),
        _ => None,
    }
}

/// Decode a batch from its JSON text.
pub fn parse_batch(json: &str) -> Result<Vec<ChangeEvent>, EventError> {
    serde_json::from_str::<StreamBatch>(json)?.into_events()
}

/// Decode a batch from a reader (file or stdin).
pub fn read_batch<R: Read>(reader: R) -> Result<Vec<ChangeEvent>, EventError> {
    serde_json::from_reader::<_, StreamBatch>(reader)?.into_events()
}
