//! GraphSink trait definition.

use anyhow::Result;

use crate::{Edge, Properties, PropertyValue, Vertex};

/// Trait for writing catalog data to a graph store.
///
/// Every call is one round trip to the store and is awaited before the next
/// one is issued; implementations must not reorder writes.
///
/// A write refused because of the graph's contents (missing vertex, duplicate
/// id) fails with a [`SinkError`](crate::SinkError) inside the `anyhow::Error`;
/// any other error means the store itself failed.
///
/// # Usage Pattern
///
/// Jobs use generics for static dispatch:
///
/// ```ignore
/// pub async fn run_bulk_load<S: GraphSink>(sink: &S, plan: &GraphPlan) -> Result<()> {
///     for vertex in &plan.vertices {
///         sink.create_vertex(vertex).await?;
///     }
///     sink.close().await
/// }
/// ```
#[async_trait::async_trait]
pub trait GraphSink: Send + Sync {
    /// Create a vertex with an explicit id, label and initial properties.
    async fn create_vertex(&self, vertex: &Vertex) -> Result<()>;

    /// Overwrite single-valued properties of an existing vertex.
    ///
    /// A `PropertyValue::Null` removes the property. Fails if no vertex has
    /// the given id.
    async fn set_properties(&self, id: &str, properties: &Properties) -> Result<()>;

    /// Add a value to a multi-valued property of an existing vertex.
    ///
    /// Values already present are not duplicated. Fails if no vertex has the
    /// given id.
    async fn add_property_value(&self, id: &str, key: &str, value: &PropertyValue)
        -> Result<()>;

    /// Delete the vertex with the given id.
    ///
    /// Deleting an id that does not exist is not an error. Whether incident
    /// edges are dropped is up to the store.
    async fn drop_vertex(&self, id: &str) -> Result<()>;

    /// Create a directed, labeled edge between two existing vertices.
    async fn add_edge(&self, edge: &Edge) -> Result<()>;

    /// Release the connection to the store.
    ///
    /// Further calls on the sink fail after this.
    async fn close(&self) -> Result<()>;
}
