//! DynamoDB source utilities for product-graph-sync
//!
//! Provides the two ways records leave the document store:
//!
//! - Full table scans, drained page by page ([`scan_all`] over a [`TableScanner`])
//! - Stream batches, decoded into ordered [`ChangeEvent`]s ([`parse_batch`])

mod client;
mod convert;
mod events;
mod scan;

pub use client::DynamoDbScanner;
pub use convert::{from_sdk_item, to_sdk_item};
pub use events::{parse_batch, read_batch, ChangeEvent, EventError, StreamBatch, StreamRecord};
pub use scan::{scan_all, ScanPage, TableScanner};
