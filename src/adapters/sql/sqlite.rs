use super::{bytes_value, quote_double};
use crate::domain::model::{ColumnInfo, ConnectionSettings, RowCap, TablePreview};
use crate::utils::error::Result;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Executor, Row, Statement, ValueRef};

/// Opens the file read-only; a missing file is an error rather than a new database.
pub async fn connect(settings: &ConnectionSettings) -> std::result::Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(&settings.database)
        .read_only(true)
        .create_if_missing(false);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn list_columns(pool: &SqlitePool, table: &str) -> Result<Vec<ColumnInfo>> {
    let rows: Vec<(String, String, i64, i64)> = sqlx::query_as(
        "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?) ORDER BY cid",
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    let pk_columns = rows.iter().filter(|(_, _, _, pk)| *pk > 0).count();
    Ok(rows
        .into_iter()
        .map(|(name, data_type, not_null, pk)| ColumnInfo {
            nullable: not_null == 0 && !is_rowid_alias(&data_type, pk, pk_columns),
            primary_key: pk > 0,
            name,
            data_type,
        })
        .collect())
}

/// 單欄 INTEGER PRIMARY KEY 是 rowid 別名，不可能為 NULL；其他主鍵 SQLite 允許 NULL
fn is_rowid_alias(data_type: &str, pk: i64, pk_columns: usize) -> bool {
    pk > 0 && pk_columns == 1 && data_type.eq_ignore_ascii_case("INTEGER")
}

pub async fn fetch_rows(pool: &SqlitePool, table: &str, cap: RowCap) -> Result<TablePreview> {
    let sql = format!("SELECT * FROM {} LIMIT ?", quote_double(table));
    tracing::debug!("🔎 {}", sql);

    let statement = pool.prepare(&sql).await?;
    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let rows = sqlx::query(&sql)
        .bind(i64::from(cap.get()))
        .fetch_all(pool)
        .await?;

    Ok(TablePreview {
        table: table.to_string(),
        rows: rows
            .iter()
            .map(|row| (0..columns.len()).map(|i| decode_cell(row, i)).collect())
            .collect(),
        columns,
    })
}

/// SQLite values carry their storage class, so the decode order only needs
/// to cover INTEGER, REAL, TEXT and BLOB.
fn decode_cell(row: &SqliteRow, i: usize) -> Value {
    match row.try_get_raw(i) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    row.try_get::<i64, _>(i)
        .map(Value::from)
        .or_else(|_| row.try_get::<f64, _>(i).map(Value::from))
        .or_else(|_| row.try_get::<String, _>(i).map(Value::from))
        .or_else(|_| row.try_get::<Vec<u8>, _>(i).map(bytes_value))
        .unwrap_or(Value::Null)
}
