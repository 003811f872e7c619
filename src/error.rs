//! Job error classification.
//!
//! Every job failure is one of three classes so that an operator can tell a
//! misconfigured endpoint from a bad record from a local file problem:
//!
//! | Class | Variants |
//! | --- | --- |
//! | `connectivity` | [`JobError::Connectivity`] |
//! | `data` | [`JobError::BadRecord`], [`JobError::BadInput`], [`JobError::GraphRejected`] |
//! | `io` | [`JobError::Output`], [`JobError::Input`] |

use std::path::PathBuf;

use catalog_types::RecordError;
use dynamodb_source::EventError;
use graph_sink::SinkError;
use thiserror::Error;

/// The external store an operation was talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    DocumentStore,
    GraphStore,
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Store::DocumentStore => f.write_str("document store"),
            Store::GraphStore => f.write_str("graph store"),
        }
    }
}

#[derive(Error, Debug)]
pub enum JobError {
    /// The store could not be reached or rejected an operation
    #[error("connectivity error: {store} request failed")]
    Connectivity {
        store: Store,
        #[source]
        source: anyhow::Error,
    },

    /// A record is missing fields or holds values of the wrong type
    #[error("bad record{}", quoted_id(.id))]
    BadRecord {
        id: Option<String>,
        #[source]
        source: RecordError,
    },

    /// The graph refused a change because of what it holds
    #[error("graph rejected the change")]
    GraphRejected(#[source] SinkError),

    /// The change-event batch itself is malformed
    #[error("bad change-event batch")]
    BadInput(#[from] EventError),

    #[error("failed to read {}", input_name(.path))]
    Input {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

fn quoted_id(id: &Option<String>) -> String {
    id.as_deref().map(|id| format!(" '{id}'")).unwrap_or_default()
}

fn input_name(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    }
}

impl JobError {
    /// Classify a sink failure: a [`SinkError`] is about the data, anything
    /// else about the store.
    pub fn graph(source: anyhow::Error) -> Self {
        match source.downcast::<SinkError>() {
            Ok(rejected) => JobError::GraphRejected(rejected),
            Err(source) => JobError::Connectivity {
                store: Store::GraphStore,
                source,
            },
        }
    }

    pub fn document_store(source: anyhow::Error) -> Self {
        JobError::Connectivity {
            store: Store::DocumentStore,
            source,
        }
    }

    pub fn bad_record(id: Option<&str>, source: RecordError) -> Self {
        JobError::BadRecord {
            id: id.map(str::to_string),
            source,
        }
    }

    /// Error class, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Connectivity { .. } => "connectivity",
            JobError::BadRecord { .. }
            | JobError::BadInput(_)
            | JobError::GraphRejected(_) => "data",
            JobError::Input { .. } | JobError::Output { .. } => "io",
        }
    }
}
