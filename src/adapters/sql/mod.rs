//! sqlx-backed [`Catalog`] for SQLite, PostgreSQL and MySQL.

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::core::connection_string::{connection_string, redacted};
use crate::domain::model::{ColumnInfo, ConnectionSettings, DbKind, RowCap, TablePreview};
use crate::domain::ports::Catalog;
use crate::utils::error::{BrowserError, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{MySqlPool, PgPool, SqlitePool};

/// Double-quoted identifier (SQLite / PostgreSQL).
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub(crate) fn bytes_value(bytes: Vec<u8>) -> Value {
    Value::from(format!("<{} bytes>", bytes.len()))
}

#[derive(Debug, Clone)]
pub enum SqlCatalog {
    Sqlite(SqlitePool),
    Postgres(PgPool),
    MySql(MySqlPool),
}

impl SqlCatalog {
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let uri = connection_string(settings)?;
        let target = redacted(&uri);
        tracing::info!("🔌 Connecting to {}", target);

        let connected = match settings.kind {
            DbKind::Sqlite => sqlite::connect(settings).await.map(SqlCatalog::Sqlite),
            DbKind::Postgres => postgres::connect(&uri).await.map(SqlCatalog::Postgres),
            DbKind::MySql => mysql::connect(&uri).await.map(SqlCatalog::MySql),
        };

        connected.map_err(|e| {
            tracing::warn!("❌ Connection to {} failed: {}", target, e);
            BrowserError::ConnectionError {
                target,
                message: e.to_string(),
            }
        })
    }

    pub async fn close(&self) {
        match self {
            SqlCatalog::Sqlite(pool) => pool.close().await,
            SqlCatalog::Postgres(pool) => pool.close().await,
            SqlCatalog::MySql(pool) => pool.close().await,
        }
    }
}

#[async_trait]
impl Catalog for SqlCatalog {
    async fn list_tables(&self) -> Result<Vec<String>> {
        match self {
            SqlCatalog::Sqlite(pool) => sqlite::list_tables(pool).await,
            SqlCatalog::Postgres(pool) => postgres::list_tables(pool).await,
            SqlCatalog::MySql(pool) => mysql::list_tables(pool).await,
        }
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        match self {
            SqlCatalog::Sqlite(pool) => sqlite::list_columns(pool, table).await,
            SqlCatalog::Postgres(pool) => postgres::list_columns(pool, table).await,
            SqlCatalog::MySql(pool) => mysql::list_columns(pool, table).await,
        }
    }

    async fn fetch_rows(&self, table: &str, cap: RowCap) -> Result<TablePreview> {
        match self {
            SqlCatalog::Sqlite(pool) => sqlite::fetch_rows(pool, table, cap).await,
            SqlCatalog::Postgres(pool) => postgres::fetch_rows(pool, table, cap).await,
            SqlCatalog::MySql(pool) => mysql::fetch_rows(pool, table, cap).await,
        }
    }
}
