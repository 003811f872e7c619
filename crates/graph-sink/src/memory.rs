//! In-memory graph used for dry runs and tests.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Edge, GraphSink, Properties, PropertyValue, SinkError, Vertex, VertexKind};

/// A vertex as held by [`MemoryGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVertex {
    pub kind: VertexKind,
    pub properties: Properties,
    pub multi_properties: BTreeMap<String, Vec<PropertyValue>>,
}

impl StoredVertex {
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn values(&self, key: &str) -> &[PropertyValue] {
        self.multi_properties
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Vertex and edge counts of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphSummary {
    pub products: usize,
    pub categories: usize,
    pub styles: usize,
    pub edges: usize,
}

#[derive(Default)]
struct MemoryState {
    vertices: BTreeMap<String, StoredVertex>,
    edges: Vec<Edge>,
    closed: bool,
}

impl MemoryState {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            bail!("graph connection is closed");
        }
        Ok(())
    }

    fn vertex_mut(&mut self, id: &str) -> Result<&mut StoredVertex> {
        match self.vertices.get_mut(id) {
            Some(vertex) => Ok(vertex),
            None => Err(SinkError::VertexNotFound { id: id.to_string() }.into()),
        }
    }
}

/// Graph store kept entirely in memory.
///
/// Mirrors the semantics the jobs rely on from a real store: vertex ids are
/// unique, updates and edges require existing vertices, and dropping a vertex
/// leaves its incident edges in place (no cascade).
#[derive(Default)]
pub struct MemoryGraph {
    inner: RwLock<MemoryState>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn vertex(&self, id: &str) -> Option<StoredVertex> {
        self.inner.read().await.vertices.get(id).cloned()
    }

    /// Ids of the vertices of the given kind.
    pub async fn vertex_ids(&self, kind: &VertexKind) -> Vec<String> {
        let guard = self.inner.read().await;
        guard
            .vertices
            .iter()
            .filter(|(_, v)| &v.kind == kind)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub async fn edges(&self) -> Vec<Edge> {
        self.inner.read().await.edges.clone()
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.read().await.closed
    }

    pub async fn summary(&self) -> GraphSummary {
        let guard = self.inner.read().await;
        let mut summary = GraphSummary {
            edges: guard.edges.len(),
            ..GraphSummary::default()
        };
        for vertex in guard.vertices.values() {
            match vertex.kind {
                VertexKind::Product => summary.products += 1,
                VertexKind::Category(_) => summary.categories += 1,
                VertexKind::Style(_) => summary.styles += 1,
            }
        }
        summary
    }
}

#[async_trait]
impl GraphSink for MemoryGraph {
    async fn create_vertex(&self, vertex: &Vertex) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.ensure_open()?;
        if guard.vertices.contains_key(&vertex.id) {
            return Err(SinkError::VertexExists {
                id: vertex.id.clone(),
            }
            .into());
        }

        let properties = vertex
            .properties
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        guard.vertices.insert(
            vertex.id.clone(),
            StoredVertex {
                kind: vertex.kind.clone(),
                properties,
                multi_properties: BTreeMap::new(),
            },
        );
        tracing::trace!("Created {} vertex {}", vertex.kind, vertex.id);
        Ok(())
    }

    async fn set_properties(&self, id: &str, properties: &Properties) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.ensure_open()?;
        let vertex = guard.vertex_mut(id)?;
        for (key, value) in properties {
            if value.is_null() {
                vertex.properties.remove(key);
            } else {
                vertex.properties.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn add_property_value(
        &self,
        id: &str,
        key: &str,
        value: &PropertyValue,
    ) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.ensure_open()?;
        let vertex = guard.vertex_mut(id)?;
        let values = vertex.multi_properties.entry(key.to_string()).or_default();
        if !values.contains(value) {
            values.push(value.clone());
        }
        Ok(())
    }

    async fn drop_vertex(&self, id: &str) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.ensure_open()?;
        if guard.vertices.remove(id).is_none() {
            tracing::debug!("Vertex {} did not exist, nothing to drop", id);
        }
        Ok(())
    }

    async fn add_edge(&self, edge: &Edge) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.ensure_open()?;
        if !guard.vertices.contains_key(&edge.from) || !guard.vertices.contains_key(&edge.to) {
            return Err(SinkError::EdgeEndpointNotFound {
                label: edge.label.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
            }
            .into());
        }
        guard.edges.push(edge.clone());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.inner.write().await.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Vertex {
        Vertex::new(id, VertexKind::Product).with_property("product_name", "Boot")
    }

    #[tokio::test]
    async fn test_create_and_read_vertex() {
        let graph = MemoryGraph::new();
        graph
            .create_vertex(&product("p1").with_property("image", PropertyValue::Null))
            .await
            .unwrap();

        let stored = graph.vertex("p1").await.unwrap();
        assert_eq!(stored.kind, VertexKind::Product);
        assert_eq!(
            stored.property("product_name"),
            Some(&PropertyValue::Text("Boot".to_string()))
        );
        assert_eq!(stored.property("image"), None);
    }

    #[tokio::test]
    async fn test_duplicate_vertex_is_rejected() {
        let graph = MemoryGraph::new();
        graph.create_vertex(&product("p1")).await.unwrap();
        let err = graph.create_vertex(&product("p1")).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SinkError>(),
            Some(&SinkError::VertexExists {
                id: "p1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_set_properties_overwrites_and_removes() {
        let graph = MemoryGraph::new();
        graph
            .create_vertex(&product("p1").with_property("image", "a.jpg"))
            .await
            .unwrap();

        let mut update = Properties::new();
        update.insert("product_name".to_string(), "Sandal".into());
        update.insert("image".to_string(), PropertyValue::Null);
        graph.set_properties("p1", &update).await.unwrap();

        let stored = graph.vertex("p1").await.unwrap();
        assert_eq!(
            stored.property("product_name"),
            Some(&PropertyValue::Text("Sandal".to_string()))
        );
        assert_eq!(stored.property("image"), None);
    }

    #[tokio::test]
    async fn test_set_properties_on_missing_vertex_fails() {
        let graph = MemoryGraph::new();
        let err = graph
            .set_properties("nope", &Properties::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<SinkError>(),
            Some(&SinkError::VertexNotFound {
                id: "nope".to_string()
            })
        );
        assert_eq!(err.to_string(), "vertex 'nope' not found");
    }

    #[tokio::test]
    async fn test_multi_valued_property_has_set_semantics() {
        let graph = MemoryGraph::new();
        graph.create_vertex(&product("p1")).await.unwrap();
        for value in ["shoe", "red", "shoe"] {
            graph
                .add_property_value("p1", "tags", &value.into())
                .await
                .unwrap();
        }
        let stored = graph.vertex("p1").await.unwrap();
        assert_eq!(
            stored.values("tags"),
            &[PropertyValue::from("shoe"), PropertyValue::from("red")]
        );
    }

    #[tokio::test]
    async fn test_drop_vertex_leaves_edges() {
        let graph = MemoryGraph::new();
        graph.create_vertex(&product("p1")).await.unwrap();
        graph
            .create_vertex(&Vertex::new("s1", VertexKind::Style("Running".to_string())))
            .await
            .unwrap();
        graph.add_edge(&Edge::has("s1", "p1")).await.unwrap();

        graph.drop_vertex("p1").await.unwrap();
        graph.drop_vertex("p1").await.unwrap();

        assert!(graph.vertex("p1").await.is_none());
        assert_eq!(graph.edges().await, vec![Edge::has("s1", "p1")]);
    }

    #[tokio::test]
    async fn test_edge_requires_endpoints() {
        let graph = MemoryGraph::new();
        graph.create_vertex(&product("p1")).await.unwrap();
        let err = graph.add_edge(&Edge::has("missing", "p1")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SinkError>(),
            Some(SinkError::EdgeEndpointNotFound { .. })
        ));
        assert!(graph.edges().await.is_empty());
    }

    #[tokio::test]
    async fn test_closed_graph_rejects_writes() {
        let graph = MemoryGraph::new();
        graph.close().await.unwrap();
        assert!(graph.is_closed().await);
        let err = graph.create_vertex(&product("p1")).await.unwrap_err();
        assert!(err.downcast_ref::<SinkError>().is_none());
    }

    #[tokio::test]
    async fn test_summary_counts_by_kind() {
        let graph = MemoryGraph::new();
        graph.create_vertex(&product("p1")).await.unwrap();
        graph.create_vertex(&product("p2")).await.unwrap();
        graph
            .create_vertex(&Vertex::new("c1", VertexKind::Category("Shoes".to_string())))
            .await
            .unwrap();
        graph.add_edge(&Edge::has("c1", "p1")).await.unwrap();

        assert_eq!(
            graph.summary().await,
            GraphSummary {
                products: 2,
                categories: 1,
                styles: 0,
                edges: 1,
            }
        );
    }
}
