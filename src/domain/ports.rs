use crate::domain::model::{ColumnInfo, RowCap, TablePreview};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only view over a database's catalog and table contents.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<String>>;
    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;
    async fn fetch_rows(&self, table: &str, cap: RowCap) -> Result<TablePreview>;
}
