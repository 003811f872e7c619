use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use graph_sink::{Edge, GraphSink, Properties, PropertyValue, SinkError, Vertex};
use neo4rs::Graph;
use tokio::sync::RwLock;

use crate::Statement;

/// Graph sink writing to Neo4j.
///
/// Holds the connection pool until [`GraphSink::close`] takes it out; any call
/// after that fails instead of silently reconnecting.
pub struct Neo4jSink {
    graph: RwLock<Option<Graph>>,
}

impl Neo4jSink {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph: RwLock::new(Some(graph)),
        }
    }

    async fn graph(&self) -> Result<Graph> {
        match self.graph.read().await.as_ref() {
            Some(graph) => Ok(graph.clone()),
            None => bail!("Neo4j connection is closed"),
        }
    }

    async fn run(&self, statement: Statement) -> Result<()> {
        tracing::trace!("Neo4j statement: {}", statement.cypher);
        self.graph()
            .await?
            .run(statement.to_query())
            .await
            .with_context(|| format!("Neo4j statement failed: {}", statement.cypher))
    }

    /// Run a statement ending in `RETURN` and fail if it matched nothing.
    async fn run_matching(&self, statement: Statement, missing: SinkError) -> Result<()> {
        tracing::trace!("Neo4j statement: {}", statement.cypher);
        let mut rows = self
            .graph()
            .await?
            .execute(statement.to_query())
            .await
            .with_context(|| format!("Neo4j statement failed: {}", statement.cypher))?;

        if rows.next().await?.is_none() {
            return Err(missing.into());
        }
        Ok(())
    }
}

#[async_trait]
impl GraphSink for Neo4jSink {
    async fn create_vertex(&self, vertex: &Vertex) -> Result<()> {
        self.run(Statement::create_vertex(vertex)).await
    }

    async fn set_properties(&self, id: &str, properties: &Properties) -> Result<()> {
        self.run_matching(
            Statement::set_properties(id, properties),
            SinkError::VertexNotFound { id: id.to_string() },
        )
        .await
    }

    async fn add_property_value(
        &self,
        id: &str,
        key: &str,
        value: &PropertyValue,
    ) -> Result<()> {
        self.run_matching(
            Statement::add_property_value(id, key, value),
            SinkError::VertexNotFound { id: id.to_string() },
        )
        .await
    }

    async fn drop_vertex(&self, id: &str) -> Result<()> {
        self.run(Statement::drop_vertex(id)).await
    }

    async fn add_edge(&self, edge: &Edge) -> Result<()> {
        self.run_matching(
            Statement::add_edge(edge),
            SinkError::EdgeEndpointNotFound {
                label: edge.label.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
            },
        )
        .await
    }

    async fn close(&self) -> Result<()> {
        if self.graph.write().await.take().is_some() {
            tracing::debug!("Closed Neo4j connection");
        }
        Ok(())
    }
}
