//! Graph store sink trait abstraction.
//!
//! This crate defines the `GraphSink` trait that abstracts over the graph
//! store a job writes to. `neo4j-sink` implements it against a live server;
//! [`MemoryGraph`] implements it in memory for dry runs and tests.
//!
//! Vertex kinds are a closed enum ([`VertexKind`]); the textual labels
//! (`product`, `category::<name>`, `style::<name>`) are only rendered at the
//! store boundary.

mod error;
mod graph;
mod memory;
mod traits;

pub use error::SinkError;
pub use graph::{Edge, Properties, PropertyValue, Vertex, VertexKind, HAS_EDGE_LABEL};
pub use memory::{GraphSummary, MemoryGraph, StoredVertex};
pub use traits::GraphSink;
