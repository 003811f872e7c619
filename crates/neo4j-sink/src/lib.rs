//! Neo4j graph sink.
//!
//! Implements [`graph_sink::GraphSink`] on top of a Neo4j server reached over
//! Bolt. Vertices become nodes labeled with the rendered vertex kind
//! (`product`, `` `category::Shoes` ``, ...) and identified by an `id`
//! property; edges become relationships.

mod connect;
mod cypher;
mod sink;

pub use connect::{bolt_uri, neo4j_connect, Neo4jOpts, DEFAULT_BOLT_PORT};
pub use cypher::Statement;
pub use sink::Neo4jSink;
