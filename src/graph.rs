//! Graph connection setup and scoped release.

use std::future::Future;

use graph_sink::GraphSink;
use neo4j_sink::{neo4j_connect, Neo4jSink};

use crate::{GraphOpts, JobError};

/// Connect to the graph store described by `opts`.
pub async fn connect_graph(opts: &GraphOpts) -> Result<Neo4jSink, JobError> {
    let neo4j_opts = opts.neo4j_opts().ok_or_else(|| {
        JobError::graph(anyhow::anyhow!(
            "--graph-endpoint is required unless --dry-run is set"
        ))
    })?;
    neo4j_connect(&neo4j_opts).await.map_err(JobError::graph)
}

/// Run `job` against `sink`, then close the sink whatever the outcome.
///
/// The job's own error wins over a failure to close; a close failure after a
/// successful job is reported as a graph-store error.
pub async fn close_after<S, T, F>(sink: &S, job: F) -> Result<T, JobError>
where
    S: GraphSink + ?Sized,
    F: Future<Output = Result<T, JobError>>,
{
    let result = job.await;
    let closed = sink.close().await;

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(JobError::graph(close_err)),
        (Err(job_err), Ok(())) => Err(job_err),
        (Err(job_err), Err(close_err)) => {
            tracing::warn!("Failed to close graph connection: {:#}", close_err);
            Err(job_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_sink::{MemoryGraph, Vertex, VertexKind};

    #[tokio::test]
    async fn test_closes_after_success() {
        let graph = MemoryGraph::new();
        let value = close_after(&graph, async { Ok::<_, JobError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert!(graph.is_closed().await);
    }

    #[tokio::test]
    async fn test_closes_after_failure() {
        let graph = MemoryGraph::new();
        let result: Result<(), JobError> = close_after(&graph, async {
            graph
                .set_properties("missing", &Default::default())
                .await
                .map_err(JobError::graph)
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), "data");
        assert!(graph.is_closed().await);
    }

    #[tokio::test]
    async fn test_sink_unusable_after_close() {
        let graph = MemoryGraph::new();
        close_after(&graph, async { Ok::<_, JobError>(()) })
            .await
            .unwrap();
        assert!(graph
            .create_vertex(&Vertex::new("p1", VertexKind::Product))
            .await
            .is_err());
    }
}
