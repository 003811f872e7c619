//! Core types for the product-graph-sync jobs.
//!
//! This crate provides the record model shared by every job:
//!
//! - [`AttributeValue`] / [`Item`] - Document-store attribute values, in the
//!   same shape the store uses on the wire (`{"S": "..."}`, `{"N": "10.5"}`, ...)
//! - [`Number`] - Store numbers normalized to integer or float
//! - [`Product`] / [`ImageLabel`] - A decoded product record
//! - [`RecordError`] - Why a record could not be decoded
//!
//! # Architecture
//!
//! ```text
//! catalog-types (this crate)
//!    │
//!    ├─── dynamodb-source  (produces Items from scans and stream batches)
//!    ├─── graph-sink       (independent; consumes nothing from here)
//!    └─── product-graph-sync (decodes Items into Products and maps them to the graph)
//! ```

mod attribute;
mod error;
mod number;
mod product;

pub use attribute::{AttributeValue, Item};
pub use error::RecordError;
pub use number::Number;
pub use product::{item_id, ImageLabel, Product, LABEL_CONFIDENCE_THRESHOLD};
