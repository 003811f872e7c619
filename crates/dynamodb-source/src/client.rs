//! DynamoDB scanner implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use catalog_types::Item;

use crate::convert::{from_sdk_item, to_sdk_item};
use crate::{ScanPage, TableScanner};

/// Scans one DynamoDB table.
///
/// Credentials and region are discovered from the environment, the same way
/// the AWS CLI does.
pub struct DynamoDbScanner {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbScanner {
    /// Create a scanner from the default AWS config chain.
    pub async fn new(table_name: impl Into<String>) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::with_client(aws_sdk_dynamodb::Client::new(&sdk_config), table_name)
    }

    pub fn with_client(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TableScanner for DynamoDbScanner {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn scan_page(&self, exclusive_start_key: Option<Item>) -> Result<ScanPage> {
        let start_key = exclusive_start_key.map(to_sdk_item).transpose()?;

        let response = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(start_key)
            .send()
            .await
            .with_context(|| format!("Failed to scan DynamoDB table: {}", self.table_name))?;

        let items = response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(from_sdk_item)
            .collect::<Result<Vec<_>>>()?;
        let last_evaluated_key = response.last_evaluated_key.map(from_sdk_item).transpose()?;

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}
