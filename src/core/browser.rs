use crate::adapters::sql::SqlCatalog;
use crate::core::connection_string::{connection_string, redacted};
use crate::core::{Catalog, ColumnInfo, ConnectionSettings, RowCap, TablePreview};
use crate::utils::error::{BrowserError, Result};

/// One connected browsing session: list tables, describe one, preview its rows.
pub struct Browser<C: Catalog> {
    catalog: C,
    label: String,
    tables: Vec<String>,
}

impl Browser<SqlCatalog> {
    /// Connects and reads the table list; a failure in either step is a
    /// connection error (e.g. a text `.sql` dump picked as a SQLite file).
    pub async fn open(settings: &ConnectionSettings) -> Result<Self> {
        let catalog = SqlCatalog::connect(settings).await?;
        let label = format!("{} database: {}", settings.kind, settings.database);
        match Self::new(catalog.clone(), label).await {
            Ok(browser) => Ok(browser),
            Err(e) => {
                catalog.close().await;
                let target = connection_string(settings)
                    .map(|uri| redacted(&uri))
                    .unwrap_or_else(|_| settings.database.clone());
                tracing::warn!("❌ Could not inspect {}: {}", target, e);
                let message = match e {
                    BrowserError::DatabaseError(inner) => inner.to_string(),
                    other => other.to_string(),
                };
                Err(BrowserError::ConnectionError { target, message })
            }
        }
    }

    pub async fn close(&self) {
        self.catalog.close().await;
    }
}

impl<C: Catalog> Browser<C> {
    pub async fn new(catalog: C, label: impl Into<String>) -> Result<Self> {
        let mut browser = Self {
            catalog,
            label: label.into(),
            tables: Vec::new(),
        };
        browser.refresh_tables().await?;
        Ok(browser)
    }

    /// e.g. `SQLite database: example.db`
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn has_tables(&self) -> bool {
        !self.tables.is_empty()
    }

    pub async fn refresh_tables(&mut self) -> Result<()> {
        self.tables = self.catalog.list_tables().await?;
        tracing::info!("📂 Found {} tables in {}", self.tables.len(), self.label);
        Ok(())
    }

    /// Accepts a 1-based position in [`tables`](Self::tables) or an exact table name.
    pub fn resolve_table(&self, input: &str) -> Result<&str> {
        let input = input.trim();
        if let Ok(index) = input.parse::<usize>() {
            if let Some(table) = index.checked_sub(1).and_then(|i| self.tables.get(i)) {
                return Ok(table);
            }
        }
        self.tables
            .iter()
            .find(|t| t.as_str() == input)
            .map(String::as_str)
            .ok_or_else(|| BrowserError::UnknownTable {
                table: input.to_string(),
            })
    }

    pub async fn describe(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let table = self.resolve_table(table)?;
        let columns = self.catalog.list_columns(table).await?;
        tracing::debug!("🧾 {} has {} columns", table, columns.len());
        Ok(columns)
    }

    pub async fn preview(&self, table: &str, cap: RowCap) -> Result<TablePreview> {
        let table = self.resolve_table(table)?;
        let preview = self.catalog.fetch_rows(table, cap).await?;
        tracing::info!(
            "📊 Fetched {} rows from {} (limit {})",
            preview.row_count(),
            table,
            cap
        );
        Ok(preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct MockCatalog {
        tables: Vec<String>,
        fetches: Arc<AtomicUsize>,
    }

    impl MockCatalog {
        fn with_tables(tables: &[&str]) -> Self {
            Self {
                tables: tables.iter().map(|t| t.to_string()).collect(),
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Catalog for MockCatalog {
        async fn list_tables(&self) -> Result<Vec<String>> {
            Ok(self.tables.clone())
        }

        async fn list_columns(&self, _table: &str) -> Result<Vec<ColumnInfo>> {
            Ok(vec![ColumnInfo {
                name: "id".to_string(),
                data_type: "INTEGER".to_string(),
                nullable: false,
                primary_key: true,
            }])
        }

        async fn fetch_rows(&self, table: &str, cap: RowCap) -> Result<TablePreview> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(TablePreview {
                table: table.to_string(),
                columns: vec!["id".to_string()],
                rows: (1..=cap.get().min(3))
                    .map(|i| vec![serde_json::Value::from(i)])
                    .collect(),
            })
        }
    }

    #[tokio::test]
    async fn test_resolve_by_number_and_name() {
        let browser = Browser::new(MockCatalog::with_tables(&["orders", "users"]), "mock")
            .await
            .unwrap();

        assert_eq!(browser.resolve_table("1").unwrap(), "orders");
        assert_eq!(browser.resolve_table(" 2 ").unwrap(), "users");
        assert_eq!(browser.resolve_table("users").unwrap(), "users");
        assert!(browser.resolve_table("0").is_err());
        assert!(browser.resolve_table("3").is_err());
        assert!(browser.resolve_table("Users").is_err());
    }

    #[tokio::test]
    async fn test_unknown_table_never_reaches_catalog() {
        let catalog = MockCatalog::with_tables(&["users"]);
        let fetches = catalog.fetches.clone();
        let browser = Browser::new(catalog, "mock").await.unwrap();

        let err = browser
            .preview("users; DROP TABLE users", RowCap::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::UnknownTable { .. }));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preview_and_describe() {
        let browser = Browser::new(MockCatalog::with_tables(&["users"]), "mock")
            .await
            .unwrap();

        let columns = browser.describe("users").await.unwrap();
        assert_eq!(columns.len(), 1);
        assert!(columns[0].primary_key);

        let preview = browser.preview("1", RowCap::default()).await.unwrap();
        assert_eq!(preview.table, "users");
        assert_eq!(preview.row_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_database() {
        let browser = Browser::new(MockCatalog::default(), "mock").await.unwrap();
        assert!(!browser.has_tables());
        assert!(browser.resolve_table("1").is_err());
    }
}
