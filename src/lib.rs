//! Product Graph Sync Library
//!
//! Keeps a property graph of the product catalog in step with the products
//! table, and exports the table as a YAML configuration file.
//!
//! # Jobs
//!
//! - Incremental sync: apply a batch of table change events to the graph
//! - Bulk load: build the category → style → product graph from a full scan
//! - Export: write every product to a YAML file
//!
//! # Crates
//!
//! - `catalog_types` - product records and document-store attribute values
//! - `dynamodb_source` - table scans and stream batch decoding
//! - `graph_sink` - the graph mutation interface and an in-memory graph
//! - `neo4j_sink` - the graph mutation interface over Neo4j
//!
//! # CLI Usage
//!
//! ```bash
//! # Apply a stream batch
//! product-graph-sync sync-events --events-file batch.json --graph-endpoint graph.internal
//!
//! # Initial graph load
//! product-graph-sync bulk-load --products-table-name products --graph-endpoint graph.internal
//!
//! # Products file for the products service
//! product-graph-sync export --products-table-name products
//! ```

use clap::Parser;
use neo4j_sink::Neo4jOpts;

pub mod bulk_load;
pub mod error;
pub mod export;
pub mod graph;
pub mod incremental;
pub mod mapping;

pub use bulk_load::{apply_plan, run_bulk_load, BulkLoadReport, GraphPlan};
pub use error::{JobError, Store};
pub use export::{run_export, DEFAULT_PRODUCTS_FILE};
pub use graph::{close_after, connect_graph};
pub use incremental::{load_events, run_incremental_sync, SyncReport};

#[derive(Parser, Clone, Debug)]
pub struct GraphOpts {
    /// Graph database endpoint (bare host, host:port or bolt:// URI)
    #[arg(long, env = "GRAPH_ENDPOINT", required_unless_present = "dry_run")]
    pub graph_endpoint: Option<String>,

    /// Graph database username
    #[arg(long, default_value = "neo4j", env = "GRAPH_USERNAME")]
    pub graph_username: String,

    /// Graph database password
    #[arg(long, default_value = "", env = "GRAPH_PASSWORD", hide_env_values = true)]
    pub graph_password: String,

    /// Graph database name
    #[arg(long, default_value = "neo4j", env = "GRAPH_DATABASE")]
    pub graph_database: String,

    /// Dry run mode - apply to an empty in-memory graph instead of the graph
    /// database; MODIFY events fail there since no product vertex exists yet
    #[arg(long)]
    pub dry_run: bool,
}

impl GraphOpts {
    /// Connection options for the graph database, if an endpoint is set.
    pub fn neo4j_opts(&self) -> Option<Neo4jOpts> {
        self.graph_endpoint.as_ref().map(|endpoint| Neo4jOpts {
            endpoint: endpoint.clone(),
            username: self.graph_username.clone(),
            password: self.graph_password.clone(),
            database: self.graph_database.clone(),
        })
    }
}

#[derive(Parser, Clone, Debug)]
pub struct TableOpts {
    /// Name of the products table
    #[arg(long, env = "PRODUCTS_TABLE")]
    pub products_table_name: String,
}
