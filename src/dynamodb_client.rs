use rusoto_dynamodb::{DescribeTableInput, DynamoDb, DynamoDbClient, ListTablesInput, TableDescription};

use crate::error::ProviderError;
use crate::model::DynamoDbTable;
use crate::pagination::Page;

const PAGE_SIZE: i64 = 100;

/// Billing mode DynamoDB implies when a table carries no billing summary.
const DEFAULT_BILLING_MODE: &str = "PROVISIONED";

pub struct DynamoDbInventoryClient {
    client: DynamoDbClient,
}

fn table_from_description(table_name: &str, table: TableDescription) -> DynamoDbTable {
    DynamoDbTable {
        table_name: table.table_name.unwrap_or_else(|| table_name.to_string()),
        table_status: table.table_status,
        item_count: table.item_count.unwrap_or(0),
        billing_mode: table
            .billing_mode_summary
            .and_then(|summary| summary.billing_mode)
            .unwrap_or_else(|| DEFAULT_BILLING_MODE.to_string()),
    }
}

impl DynamoDbInventoryClient {
    pub fn new_with_client(client: DynamoDbClient) -> Self {
        DynamoDbInventoryClient { client }
    }

    /// One page of table names; the last name on the page starts the next one.
    pub async fn list_tables(
        &self,
        exclusive_start_table_name: Option<String>,
    ) -> Result<Page<String>, ProviderError> {
        let result = self
            .client
            .list_tables(ListTablesInput {
                exclusive_start_table_name,
                limit: Some(PAGE_SIZE),
                ..ListTablesInput::default()
            })
            .await?;
        Ok(Page::new(
            result.table_names.unwrap_or_default(),
            result.last_evaluated_table_name,
        ))
    }

    pub async fn describe_table(&self, table_name: &str) -> Result<DynamoDbTable, ProviderError> {
        let result = self
            .client
            .describe_table(DescribeTableInput {
                table_name: table_name.to_string(),
                ..DescribeTableInput::default()
            })
            .await?;
        let table = result.table.ok_or_else(|| {
            ProviderError::Parse(format!("DescribeTable returned no table for {}", table_name))
        })?;
        Ok(table_from_description(table_name, table))
    }
}
