use anyhow::Context;
use neo4rs::{query, ConfigBuilder, Graph};

use crate::Neo4jSink;

pub const DEFAULT_BOLT_PORT: u16 = 7687;

/// Connection options for the Neo4j sink (library type without clap).
#[derive(Clone, Debug)]
pub struct Neo4jOpts {
    /// Host, `host:port`, or a full `bolt://` / `neo4j://` URI
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Expand a bare endpoint into a Bolt URI.
///
/// `graph.internal` becomes `bolt://graph.internal:7687`; endpoints that
/// already carry a scheme are used as-is.
pub fn bolt_uri(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.contains("://") {
        endpoint.to_string()
    } else if endpoint.contains(':') {
        format!("bolt://{endpoint}")
    } else {
        format!("bolt://{endpoint}:{DEFAULT_BOLT_PORT}")
    }
}

/// Connect to Neo4j and check the server answers before any job starts.
pub async fn neo4j_connect(opts: &Neo4jOpts) -> anyhow::Result<Neo4jSink> {
    let uri = bolt_uri(&opts.endpoint);
    tracing::debug!("Connecting to Neo4j at {} (database {})", uri, opts.database);

    let config = ConfigBuilder::default()
        .uri(uri.as_str())
        .user(opts.username.as_str())
        .password(opts.password.as_str())
        .db(opts.database.as_str())
        .build()
        .with_context(|| format!("Invalid Neo4j connection settings for {uri}"))?;

    let graph =
        Graph::connect(config).with_context(|| format!("Failed to connect to Neo4j at {uri}"))?;

    graph
        .run(query("RETURN 1"))
        .await
        .with_context(|| format!("Neo4j at {uri} did not answer"))?;

    tracing::info!("Connected to Neo4j at {}", uri);
    Ok(Neo4jSink::new(graph))
}
