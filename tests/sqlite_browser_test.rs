use anyhow::Result;
use db_visualizer::app::{print_table, run_explorer};
use db_visualizer::config::cli::Prompter;
use db_visualizer::core::render::OutputFormat;
use db_visualizer::core::seed::{seed_database, SeedOptions};
use db_visualizer::domain::ports::Catalog;
use db_visualizer::{Browser, BrowserError, ConnectionSettings, RowCap, SqlCatalog};
use serde_json::Value;
use sqlx::SqlitePool;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

async fn seeded_db(dir: &TempDir) -> Result<ConnectionSettings> {
    let path = dir.path().join("example.db");
    seed_database(&SeedOptions {
        path: path.clone(),
        users: 100,
        orders: 500,
        seed: Some(42),
    })
    .await?;
    Ok(ConnectionSettings::sqlite(path.to_string_lossy()))
}

async fn writable_pool(path: &Path) -> Result<SqlitePool> {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    Ok(SqlitePool::connect(&url).await?)
}

#[tokio::test]
async fn test_read_pipeline_on_seeded_database() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = seeded_db(&dir).await?;

    let browser = Browser::open(&settings).await?;
    assert!(browser.label().starts_with("SQLite database:"));
    assert_eq!(browser.tables(), ["orders", "users"]);

    let columns = browser.describe("users").await?;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "name", "email", "age", "signup_date"]);
    assert!(columns[0].primary_key);
    assert!(!columns[0].nullable);
    assert_eq!(columns[4].data_type, "DATE");
    assert!(columns[1].nullable);

    let preview = browser.preview("users", RowCap::default()).await?;
    assert_eq!(preview.row_count(), 100);
    assert_eq!(preview.columns.len(), 5);
    assert_eq!(preview.rows[0][0], Value::from(1));
    assert_eq!(preview.rows[0][1], Value::from("User 0"));
    assert_eq!(preview.rows[0][4], Value::from("2020-01-01"));

    let capped = browser.preview("orders", RowCap::new(10)?).await?;
    assert_eq!(capped.row_count(), 10);
    assert!(capped.rows.iter().all(|row| row[3].is_number()));

    browser.close().await;
    Ok(())
}

#[tokio::test]
async fn test_empty_table_still_reports_columns() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("empty.db");
    let pool = writable_pool(&path).await?;
    sqlx::query("CREATE TABLE events (id INTEGER PRIMARY KEY, payload BLOB, note TEXT)")
        .execute(&pool)
        .await?;
    pool.close().await;

    let catalog = SqlCatalog::connect(&ConnectionSettings::sqlite(path.to_string_lossy())).await?;
    let preview = catalog.fetch_rows("events", RowCap::default()).await?;

    assert_eq!(preview.columns, ["id", "payload", "note"]);
    assert!(preview.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_awkward_identifiers_and_value_types() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("odd.db");
    let pool = writable_pool(&path).await?;
    sqlx::query(r#"CREATE TABLE "odd ""name""" (x INTEGER, y REAL, z TEXT, b BLOB)"#)
        .execute(&pool)
        .await?;
    sqlx::query(r#"INSERT INTO "odd ""name""" VALUES (1, 2.5, 'three', x'00ff'), (NULL, NULL, NULL, NULL)"#)
        .execute(&pool)
        .await?;
    pool.close().await;

    let browser = Browser::open(&ConnectionSettings::sqlite(path.to_string_lossy())).await?;
    assert_eq!(browser.tables(), [r#"odd "name""#]);

    let preview = browser.preview("1", RowCap::default()).await?;
    assert_eq!(
        preview.rows[0],
        vec![
            Value::from(1),
            Value::from(2.5),
            Value::from("three"),
            Value::from("<2 bytes>")
        ]
    );
    assert!(preview.rows[1].iter().all(Value::is_null));
    Ok(())
}

#[tokio::test]
async fn test_database_without_tables() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("blank.db");
    let pool = writable_pool(&path).await?;
    sqlx::query("PRAGMA user_version = 1").execute(&pool).await?;
    pool.close().await;

    let browser = Browser::open(&ConnectionSettings::sqlite(path.to_string_lossy())).await?;
    assert!(!browser.has_tables());

    let mut prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
    run_explorer(&browser, &mut prompter, RowCap::default(), OutputFormat::Table).await?;
    let output = String::from_utf8(prompter.output().clone())?;
    assert!(output.contains("No tables found in this database."));

    let mut out = Vec::new();
    print_table(&browser, "users", RowCap::default(), OutputFormat::Table, true, &mut out).await?;
    assert_eq!(String::from_utf8(out)?, "⚠️ No tables found in this database.\n");
    Ok(())
}

#[tokio::test]
async fn test_text_dump_is_reported_as_connection_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("dump.sql");
    std::fs::write(&path, "CREATE TABLE users (id INTEGER PRIMARY KEY);\n".repeat(20))?;

    let err = match Browser::open(&ConnectionSettings::sqlite(path.to_string_lossy())).await {
        Ok(_) => panic!("a text dump should not open as a database"),
        Err(e) => e,
    };
    assert!(matches!(err, BrowserError::ConnectionError { .. }));
    assert!(err.user_friendly_message().starts_with("Failed to connect:"));
    assert_eq!(err.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_only_integer_primary_keys_are_not_null() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("keys.db");
    let pool = writable_pool(&path).await?;
    for ddl in [
        "CREATE TABLE rowid_key (id INTEGER PRIMARY KEY, note TEXT)",
        "CREATE TABLE text_key (code TEXT PRIMARY KEY, note TEXT NOT NULL)",
        "CREATE TABLE pair_key (a INTEGER, b INTEGER, PRIMARY KEY (a, b))",
    ] {
        sqlx::query(ddl).execute(&pool).await?;
    }
    pool.close().await;

    let browser = Browser::open(&ConnectionSettings::sqlite(path.to_string_lossy())).await?;
    let nullable = |columns: Vec<db_visualizer::ColumnInfo>| -> Vec<(String, bool, bool)> {
        columns
            .into_iter()
            .map(|c| (c.name, c.primary_key, c.nullable))
            .collect()
    };

    assert_eq!(
        nullable(browser.describe("rowid_key").await?),
        [("id".to_string(), true, false), ("note".to_string(), false, true)]
    );
    assert_eq!(
        nullable(browser.describe("text_key").await?),
        [("code".to_string(), true, true), ("note".to_string(), false, false)]
    );
    assert_eq!(
        nullable(browser.describe("pair_key").await?),
        [("a".to_string(), true, true), ("b".to_string(), true, true)]
    );
    Ok(())
}

#[tokio::test]
async fn test_connection_is_read_only() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = seeded_db(&dir).await?;

    let catalog = SqlCatalog::connect(&settings).await?;
    let SqlCatalog::Sqlite(pool) = &catalog else {
        panic!("expected a SQLite catalog");
    };
    let write = sqlx::query("DELETE FROM users").execute(pool).await;
    assert!(write.is_err());
    assert_eq!(catalog.list_tables().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_scripted_explorer_session() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = seeded_db(&dir).await?;
    let browser = Browser::open(&settings).await?;

    let script = "nope\n2\nlimit 5\nschema\norders\nbogus\ntables\nq\n";
    let mut prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
    run_explorer(&browser, &mut prompter, RowCap::default(), OutputFormat::Table).await?;

    let output = String::from_utf8(prompter.output().clone())?;
    assert!(output.contains("📂 Schema Explorer"));
    assert!(output.contains("Unknown table: nope"));
    assert!(output.contains("📊 Data: users (limit 100)"));
    assert!(output.contains("(100 rows)"));
    assert!(output.contains("Rows to fetch must be between 10 and 1000; using 10"));
    assert!(output.contains("📊 Data: users (limit 10)"));
    assert!(output.contains("(10 rows)"));
    assert!(output.contains("signup_date | DATE"));
    assert!(output.contains("📊 Data: orders (limit 10)"));
    assert!(output.contains("Unknown table: bogus"));
    Ok(())
}

#[tokio::test]
async fn test_print_table_as_csv() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = seeded_db(&dir).await?;
    let browser = Browser::open(&settings).await?;

    let mut out = Vec::new();
    print_table(&browser, "users", RowCap::new(10)?, OutputFormat::Csv, false, &mut out).await?;
    let text = String::from_utf8(out)?;
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("📊 Data: users (limit 10)"));
    assert_eq!(lines.next(), Some("id,name,email,age,signup_date"));
    assert!(lines.next().unwrap_or("").starts_with("1,User 0,user0@example.com,"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_table_is_rejected_before_sql() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = seeded_db(&dir).await?;
    let browser = Browser::open(&settings).await?;

    let err = browser
        .preview("users; DROP TABLE users", RowCap::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BrowserError::UnknownTable { .. }));
    assert_eq!(browser.preview("users", RowCap::default()).await?.row_count(), 100);
    Ok(())
}
