//! Command-line interface for product-graph-sync
//!
//! # Usage Examples
//!
//! ## Incremental Sync
//! ```bash
//! # Apply a DynamoDB Streams batch read from a file
//! product-graph-sync sync-events \
//!   --events-file batch.json \
//!   --graph-endpoint graph.internal
//!
//! # Or from stdin, against an in-memory graph
//! cat batch.json | product-graph-sync sync-events --dry-run
//! ```
//!
//! ## Bulk Load
//! ```bash
//! product-graph-sync bulk-load \
//!   --products-table-name products \
//!   --graph-endpoint bolt://graph.internal:7687 \
//!   --graph-password secret
//! ```
//!
//! ## Export
//! ```bash
//! product-graph-sync export \
//!   --products-table-name products \
//!   --products-file src/products-service/data/products.yaml
//! ```
//!
//! Every graph option can also be set through its environment variable
//! (`GRAPH_ENDPOINT`, `GRAPH_USERNAME`, `GRAPH_PASSWORD`, `GRAPH_DATABASE`),
//! and the table name through `PRODUCTS_TABLE`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dynamodb_source::DynamoDbScanner;
use graph_sink::MemoryGraph;
use product_graph_sync::{
    close_after, connect_graph, load_events, run_bulk_load, run_export, run_incremental_sync,
    GraphOpts, JobError, TableOpts, DEFAULT_PRODUCTS_FILE,
};

#[derive(Parser)]
#[command(name = "product-graph-sync")]
#[command(about = "Keep the product graph and products file in step with the products table")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a batch of table change events to the graph
    SyncEvents {
        /// DynamoDB Streams batch (JSON); read from stdin when omitted
        #[arg(long)]
        events_file: Option<PathBuf>,

        #[command(flatten)]
        graph_opts: GraphOpts,
    },

    /// Build the category, style and product graph from a full table scan
    BulkLoad {
        #[command(flatten)]
        table_opts: TableOpts,

        #[command(flatten)]
        graph_opts: GraphOpts,
    },

    /// Write every product to a YAML file
    Export {
        #[command(flatten)]
        table_opts: TableOpts,

        /// Output file, overwritten on every run
        #[arg(long, default_value = DEFAULT_PRODUCTS_FILE)]
        products_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        if let Some(job_err) = e.downcast_ref::<JobError>() {
            tracing::error!(kind = job_err.kind(), "Job failed");
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::SyncEvents {
            events_file,
            graph_opts,
        } => run_sync_events(events_file, graph_opts).await,
        Commands::BulkLoad {
            table_opts,
            graph_opts,
        } => run_bulk(table_opts, graph_opts).await,
        Commands::Export {
            table_opts,
            products_file,
        } => {
            let scanner = DynamoDbScanner::new(&table_opts.products_table_name).await;
            let count = run_export(&scanner, &products_file).await?;
            println!("Products updated: {count}");
            Ok(())
        }
    }
}

async fn run_sync_events(events_file: Option<PathBuf>, graph_opts: GraphOpts) -> anyhow::Result<()> {
    let events = load_events(events_file.as_deref())?;

    let report = if graph_opts.dry_run {
        let graph = MemoryGraph::new();
        let report = close_after(&graph, run_incremental_sync(&graph, &events)).await?;
        log_dry_run(&graph).await;
        report
    } else {
        let sink = connect_graph(&graph_opts).await?;
        close_after(&sink, run_incremental_sync(&sink, &events)).await?
    };

    println!(
        "Applied {} events: {} inserted, {} modified, {} removed",
        events.len(),
        report.inserted,
        report.modified,
        report.removed
    );
    Ok(())
}

async fn run_bulk(table_opts: TableOpts, graph_opts: GraphOpts) -> anyhow::Result<()> {
    let scanner = DynamoDbScanner::new(&table_opts.products_table_name).await;

    let report = if graph_opts.dry_run {
        let graph = MemoryGraph::new();
        let report = close_after(&graph, run_bulk_load(&scanner, &graph)).await?;
        log_dry_run(&graph).await;
        report
    } else {
        let sink = connect_graph(&graph_opts).await?;
        close_after(&sink, run_bulk_load(&scanner, &sink)).await?
    };

    println!(
        "Loaded {} products, {} categories, {} styles",
        report.products, report.categories, report.styles
    );
    Ok(())
}

async fn log_dry_run(graph: &MemoryGraph) {
    let summary = graph.summary().await;
    tracing::info!(
        "Dry run: graph would hold {} products, {} categories, {} styles, {} edges",
        summary.products,
        summary.categories,
        summary.styles,
        summary.edges
    );
}
