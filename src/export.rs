//! Export: dump the products table to a YAML configuration file.
//!
//! Only a whitelist of attribute kinds survives normalization:
//!
//! | Attribute | Written as |
//! | --- | --- |
//! | string | string |
//! | number | integer when integral, float otherwise |
//! | `image_labels` list | list of `{confidence: float, name: string}` |
//!
//! Everything else (booleans, nulls, maps, sets, binary, other lists) is
//! dropped from the record.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use catalog_types::{item_id, AttributeValue, Item, Number, RecordError};
use dynamodb_source::{scan_all, TableScanner};
use serde::Serialize;

use crate::JobError;

pub const DEFAULT_PRODUCTS_FILE: &str = "src/products-service/data/products.yaml";

const IMAGE_LABELS: &str = "image_labels";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportLabel {
    pub confidence: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportValue {
    Text(String),
    Number(Number),
    Labels(Vec<ExportLabel>),
}

/// One exported product; keys serialize in sorted order.
pub type ExportRecord = BTreeMap<String, ExportValue>;

/// Normalize a scanned item to its exported form.
pub fn normalize_item(item: &Item) -> Result<ExportRecord, JobError> {
    let mut record = ExportRecord::new();

    for (field, value) in item {
        let exported = match value {
            AttributeValue::L(labels) if field == IMAGE_LABELS => {
                let labels = labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| export_label(i, label))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| JobError::bad_record(item_id(item), e))?;
                ExportValue::Labels(labels)
            }
            AttributeValue::S(text) => ExportValue::Text(text.clone()),
            AttributeValue::N(_) => ExportValue::Number(
                value
                    .as_number(field)
                    .map_err(|e| JobError::bad_record(item_id(item), e))?,
            ),
            other => {
                tracing::trace!("Dropping {} attribute '{}'", other.kind(), field);
                continue;
            }
        };
        record.insert(field.clone(), exported);
    }

    Ok(record)
}

fn export_label(index: usize, label: &AttributeValue) -> Result<ExportLabel, RecordError> {
    let field = format!("{IMAGE_LABELS}[{index}]");
    let entry = label.as_map(&field)?;

    let name_field = format!("{field}.name");
    let name = entry
        .get("name")
        .ok_or_else(|| RecordError::missing(name_field.as_str()))?
        .as_str(&name_field)?;

    let confidence_field = format!("{field}.confidence");
    let confidence = entry
        .get("confidence")
        .ok_or_else(|| RecordError::missing(confidence_field.as_str()))?
        .as_number(&confidence_field)?;

    Ok(ExportLabel {
        confidence: confidence.as_f64(),
        name: name.to_string(),
    })
}

/// Write `records` as a YAML sequence, replacing whatever was at `path`.
pub fn write_products_file(path: &Path, records: &[ExportRecord]) -> Result<(), JobError> {
    let write = || -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {parent:?}"))?;
        }
        let yaml = serde_yaml::to_string(records).context("Failed to serialize products")?;
        std::fs::write(path, yaml)?;
        Ok(())
    };

    write().map_err(|source| JobError::Output {
        path: path.to_path_buf(),
        source,
    })
}

/// Scan the whole table and write it to `path`; returns the number of records written.
pub async fn run_export<T: TableScanner + ?Sized>(scanner: &T, path: &Path) -> Result<usize, JobError> {
    tracing::info!(
        "Exporting '{}' to {}",
        scanner.table_name(),
        path.display()
    );

    let items = scan_all(scanner).await.map_err(JobError::document_store)?;
    let records = items
        .iter()
        .map(normalize_item)
        .collect::<Result<Vec<_>, _>>()?;

    write_products_file(path, &records)?;

    tracing::info!("Products updated: {}", records.len());
    Ok(records.len())
}
