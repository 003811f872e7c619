//! Errors for mutations the graph contents reject.

use thiserror::Error;

/// A mutation the store refused because of what the graph holds, as opposed
/// to a failure to reach the store.
///
/// Sinks return these wrapped in `anyhow::Error`; callers tell them apart
/// with `downcast_ref::<SinkError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("vertex '{id}' not found")]
    VertexNotFound { id: String },

    #[error("vertex '{id}' already exists")]
    VertexExists { id: String },

    #[error("cannot add '{label}' edge {from} -> {to}: endpoint vertex not found")]
    EdgeEndpointNotFound {
        label: String,
        from: String,
        to: String,
    },
}
