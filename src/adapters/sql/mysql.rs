use super::bytes_value;
use crate::domain::model::{ColumnInfo, RowCap, TablePreview};
use crate::utils::error::Result;
use serde_json::Value;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use std::time::Duration;

pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

fn is_native(type_name: &str) -> bool {
    matches!(
        type_name,
        "BOOLEAN"
            | "TINYINT"
            | "SMALLINT"
            | "MEDIUMINT"
            | "INT"
            | "BIGINT"
            | "TINYINT UNSIGNED"
            | "SMALLINT UNSIGNED"
            | "MEDIUMINT UNSIGNED"
            | "INT UNSIGNED"
            | "BIGINT UNSIGNED"
            | "FLOAT"
            | "DOUBLE"
            | "CHAR"
            | "VARCHAR"
            | "TEXT"
            | "TINYTEXT"
            | "MEDIUMTEXT"
            | "LONGTEXT"
            | "BINARY"
            | "VARBINARY"
            | "BLOB"
            | "TINYBLOB"
            | "MEDIUMBLOB"
            | "LONGBLOB"
            | "JSON"
            | "DATE"
            | "DATETIME"
            | "TIMESTAMP"
    )
}

pub async fn connect(uri: &str) -> std::result::Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(uri)
        .await
}

// information_schema 欄位在部分版本會回傳 VARBINARY，統一 CAST 成 CHAR
pub async fn list_tables(pool: &MySqlPool) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT CAST(TABLE_NAME AS CHAR) FROM information_schema.TABLES \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
         ORDER BY TABLE_NAME",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn list_columns(pool: &MySqlPool, table: &str) -> Result<Vec<ColumnInfo>> {
    let rows: Vec<(String, String, i64, i64)> = sqlx::query_as(
        "SELECT CAST(COLUMN_NAME AS CHAR), \
                CAST(COLUMN_TYPE AS CHAR), \
                CAST(IS_NULLABLE = 'YES' AS SIGNED), \
                CAST(COLUMN_KEY = 'PRI' AS SIGNED) \
         FROM information_schema.COLUMNS \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
         ORDER BY ORDINAL_POSITION",
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(name, data_type, nullable, primary_key)| ColumnInfo {
            name,
            data_type,
            nullable: nullable != 0,
            primary_key: primary_key != 0,
        })
        .collect())
}

pub async fn fetch_rows(pool: &MySqlPool, table: &str, cap: RowCap) -> Result<TablePreview> {
    let quoted = quote_backtick(table);
    let probe_sql = format!("SELECT * FROM {} LIMIT 0", quoted);
    let probe = pool.prepare(&probe_sql).await?;

    let mut columns = Vec::with_capacity(probe.columns().len());
    let mut projection = Vec::with_capacity(probe.columns().len());
    for column in probe.columns() {
        let name = column.name().to_string();
        let ident = quote_backtick(&name);
        if is_native(column.type_info().name()) {
            projection.push(ident);
        } else {
            projection.push(format!("CAST({} AS CHAR) AS {}", ident, ident));
        }
        columns.push(name);
    }

    let sql = format!("SELECT {} FROM {} LIMIT ?", projection.join(", "), quoted);
    tracing::debug!("🔎 {}", sql);

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

fn decode_cell(row: &MySqlRow, i: usize) -> Value {
    let type_name = match row.try_get_raw(i) {
        Ok(raw) if !raw.is_null() => raw.type_info().name().to_string(),
        _ => return Value::Null,
    };

    let decoded = match type_name.as_str() {
        "BOOLEAN" => row.try_get::<bool, _>(i).map(Value::from),
        name if name.ends_with("UNSIGNED") => row.try_get::<u64, _>(i).map(Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<i64, _>(i).map(Value::from)
        }
        "FLOAT" => row.try_get::<f32, _>(i).map(Value::from),
        "DOUBLE" => row.try_get::<f64, _>(i).map(Value::from),
        "JSON" => row.try_get::<Value, _>(i),
        "DATE" => row.try_get::<NaiveDate, _>(i).map(|d| Value::from(d.to_string())),
        "DATETIME" => row
            .try_get::<NaiveDateTime, _>(i)
            .map(|t| Value::from(t.to_string())),
        "TIMESTAMP" => row
            .try_get::<DateTime<Utc>, _>(i)
            .map(|t| Value::from(t.to_rfc3339())),
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Vec<u8>, _>(i)
            .map(|bytes| match String::from_utf8(bytes) {
                Ok(text) => Value::from(text),
                Err(e) => bytes_value(e.into_bytes()),
            }),
        _ => row.try_get::<String, _>(i).map(Value::from),
    };

    decoded
        .or_else(|_| row.try_get::<String, _>(i).map(Value::from))
        .unwrap_or(Value::Null)
}
