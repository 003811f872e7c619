//! Paginated table scans.

use anyhow::Result;
use async_trait::async_trait;
use catalog_types::Item;

/// One page of scan results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Key to resume from; `None` on the last page
    pub last_evaluated_key: Option<Item>,
}

/// A table that can be scanned one page at a time.
#[async_trait]
pub trait TableScanner: Send + Sync {
    /// Name of the scanned table, for logging.
    fn table_name(&self) -> &str;

    /// Fetch the page starting after `exclusive_start_key` (from the start when `None`).
    async fn scan_page(&self, exclusive_start_key: Option<Item>) -> Result<ScanPage>;
}

/// Read every record of the table, following `last_evaluated_key` until the
/// store reports no further page.
pub async fn scan_all<S: TableScanner + ?Sized>(scanner: &S) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut start_key: Option<Item> = None;
    let mut pages = 0usize;

    loop {
        let page = scanner.scan_page(start_key.take()).await?;
        pages += 1;
        tracing::debug!(
            "Scanned page {} of '{}': {} items",
            pages,
            scanner.table_name(),
            page.items.len()
        );
        items.extend(page.items);

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }

    tracing::info!(
        "Scanned {} items from '{}' in {} pages",
        items.len(),
        scanner.table_name(),
        pages
    );
    Ok(items)
}
