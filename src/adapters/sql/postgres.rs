use super::{bytes_value, quote_double};
use crate::domain::model::{ColumnInfo, RowCap, TablePreview};
use crate::utils::error::Result;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::Uuid;
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use std::time::Duration;

/// Types decoded natively; every other column is selected as `::text`.
const NATIVE_TYPES: [&str; 18] = [
    "BOOL",
    "INT2",
    "INT4",
    "INT8",
    "FLOAT4",
    "FLOAT8",
    "TEXT",
    "VARCHAR",
    "BPCHAR",
    "NAME",
    "JSON",
    "JSONB",
    "UUID",
    "DATE",
    "TIME",
    "TIMESTAMP",
    "TIMESTAMPTZ",
    "BYTEA",
];

pub async fn connect(uri: &str) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(uri)
        .await
}

pub async fn list_tables(pool: &PgPool) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT table_name::text FROM information_schema.tables \
         WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn list_columns(pool: &PgPool, table: &str) -> Result<Vec<ColumnInfo>> {
    let rows: Vec<(String, String, bool, bool)> = sqlx::query_as(
        r#"
        SELECT c.column_name::text,
               c.data_type::text,
               c.is_nullable = 'YES',
               EXISTS (
                   SELECT 1
                   FROM information_schema.table_constraints tc
                   JOIN information_schema.key_column_usage k
                     ON k.constraint_name = tc.constraint_name
                    AND k.table_schema = tc.table_schema
                    AND k.table_name = tc.table_name
                   WHERE tc.constraint_type = 'PRIMARY KEY'
                     AND tc.table_schema = c.table_schema
                     AND tc.table_name = c.table_name
                     AND k.column_name = c.column_name
               )
        FROM information_schema.columns c
        WHERE c.table_schema = current_schema() AND c.table_name = $1
        ORDER BY c.ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(name, data_type, nullable, primary_key)| ColumnInfo {
            name,
            data_type,
            nullable,
            primary_key,
        })
        .collect())
}

pub async fn fetch_rows(pool: &PgPool, table: &str, cap: RowCap) -> Result<TablePreview> {
    let quoted = quote_double(table);
    let probe_sql = format!("SELECT * FROM {} LIMIT 0", quoted);
    let probe = pool.prepare(&probe_sql).await?;

    let mut columns = Vec::with_capacity(probe.columns().len());
    let mut projection = Vec::with_capacity(probe.columns().len());
    for column in probe.columns() {
        let name = column.name().to_string();
        projection.push(select_item(&name, column.type_info().name()));
        columns.push(name);
    }

    // 沒有欄位的資料表（CREATE TABLE t()）仍可 SELECT *
    let select_list = if projection.is_empty() {
        "*".to_string()
    } else {
        projection.join(", ")
    };
    let sql = format!("SELECT {} FROM {} LIMIT $1", select_list, quoted);
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

fn select_item(name: &str, type_name: &str) -> String {
    let ident = quote_double(name);
    if NATIVE_TYPES.contains(&type_name) {
        ident
    } else {
        format!("{}::text AS {}", ident, ident)
    }
}

fn decode_cell(row: &PgRow, i: usize) -> Value {
    let type_name = match row.try_get_raw(i) {
        Ok(raw) if !raw.is_null() => raw.type_info().name().to_string(),
        _ => return Value::Null,
    };

    let decoded = match type_name.as_str() {
        "BOOL" => row.try_get::<bool, _>(i).map(Value::from),
        "INT2" => row.try_get::<i16, _>(i).map(Value::from),
        "INT4" => row.try_get::<i32, _>(i).map(Value::from),
        "INT8" => row.try_get::<i64, _>(i).map(Value::from),
        "FLOAT4" => row.try_get::<f32, _>(i).map(Value::from),
        "FLOAT8" => row.try_get::<f64, _>(i).map(Value::from),
        "JSON" | "JSONB" => row.try_get::<Value, _>(i),
        "UUID" => row.try_get::<Uuid, _>(i).map(|u| Value::from(u.to_string())),
        "DATE" => row.try_get::<NaiveDate, _>(i).map(|d| Value::from(d.to_string())),
        "TIME" => row.try_get::<NaiveTime, _>(i).map(|t| Value::from(t.to_string())),
        "TIMESTAMP" => row
            .try_get::<NaiveDateTime, _>(i)
            .map(|t| Value::from(t.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<DateTime<Utc>, _>(i)
            .map(|t| Value::from(t.to_rfc3339())),
        "BYTEA" => row.try_get::<Vec<u8>, _>(i).map(bytes_value),
        _ => row.try_get::<String, _>(i).map(Value::from),
    };

    decoded
        .or_else(|_| row.try_get::<String, _>(i).map(Value::from))
        .unwrap_or(Value::Null)
}
