//! Incremental sync: apply one change-event batch to the graph.
//!
//! Events are applied strictly in order, one mutation sequence per event:
//!
//! - INSERT: create the product vertex, then add its confident labels
//! - MODIFY: overwrite every tracked property, then add its confident labels
//! - REMOVE: drop the vertex
//!
//! Labels are only ever added. A MODIFY does not clear label values written
//! by earlier events, so labels from a previous image analysis stay on the
//! vertex next to the new ones.
//!
//! The first failing event aborts the batch; events before it stay applied and
//! retrying the whole batch is up to whoever delivered it.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use dynamodb_source::{read_batch, ChangeEvent};
use graph_sink::GraphSink;

use crate::mapping::{add_confident_labels, decode_product, product_properties, product_vertex};
use crate::JobError;

/// What one batch did to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub modified: usize,
    pub removed: usize,
    pub labels_written: usize,
}

/// Read a change-event batch from `path`, or from stdin when `None`.
pub fn load_events(path: Option<&Path>) -> Result<Vec<ChangeEvent>, JobError> {
    let events = match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| JobError::Input {
                path: Some(path.to_path_buf()),
                source,
            })?;
            read_batch(BufReader::new(file))?
        }
        None => read_batch(std::io::stdin().lock())?,
    };
    tracing::info!("Loaded {} change events", events.len());
    Ok(events)
}

/// Apply a single event.
pub async fn apply_event<S: GraphSink + ?Sized>(
    sink: &S,
    event: &ChangeEvent,
    report: &mut SyncReport,
) -> Result<(), JobError> {
    match event {
        ChangeEvent::Insert(item) => {
            let product = decode_product(item)?;
            tracing::debug!("Inserting product vertex {}", product.id);
            sink.create_vertex(&product_vertex(&product))
                .await
                .map_err(JobError::graph)?;
            report.labels_written += add_confident_labels(sink, &product).await?;
            report.inserted += 1;
        }
        ChangeEvent::Modify(item) => {
            let product = decode_product(item)?;
            tracing::debug!("Updating product vertex {}", product.id);
            sink.set_properties(&product.id, &product_properties(&product))
                .await
                .map_err(JobError::graph)?;
            report.labels_written += add_confident_labels(sink, &product).await?;
            report.modified += 1;
        }
        ChangeEvent::Remove { id } => {
            tracing::debug!("Dropping product vertex {}", id);
            sink.drop_vertex(id).await.map_err(JobError::graph)?;
            report.removed += 1;
        }
    }
    Ok(())
}

/// Apply every event of a batch in order, stopping at the first failure.
pub async fn run_incremental_sync<S: GraphSink + ?Sized>(
    sink: &S,
    events: &[ChangeEvent],
) -> Result<SyncReport, JobError> {
    tracing::info!("Applying {} change events to the graph", events.len());
    let mut report = SyncReport::default();

    for (index, event) in events.iter().enumerate() {
        if let Err(e) = apply_event(sink, event, &mut report).await {
            tracing::error!(
                kind = e.kind(),
                "{} event {} of {} failed, aborting the remaining {}",
                event.name(),
                index + 1,
                events.len(),
                events.len() - index - 1
            );
            return Err(e);
        }
    }

    tracing::info!(
        "Incremental sync completed: {} inserted, {} modified, {} removed, {} label writes",
        report.inserted,
        report.modified,
        report.removed,
        report.labels_written
    );
    Ok(report)
}
