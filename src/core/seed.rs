//! Demo data generator for a local SQLite database.

use crate::utils::error::{BrowserError, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "example.db";
pub const PRODUCTS: [&str; 3] = ["Widget A", "Widget B", "Gadget X"];

const CREATE_USERS: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT,
    email TEXT,
    age INTEGER,
    signup_date DATE
)";

const CREATE_ORDERS: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    product_name TEXT,
    amount DECIMAL(10, 2),
    order_date DATE,
    FOREIGN KEY (user_id) REFERENCES users (id)
)";

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub path: PathBuf,
    pub users: u32,
    pub orders: u32,
    /// Fixed RNG seed for reproducible data.
    pub seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            users: 100,
            orders: 500,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users_inserted: u64,
    pub orders_inserted: u64,
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

fn day(offset: u32) -> NaiveDate {
    start_date()
        .checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or_else(start_date)
}

/// Creates `users` and `orders` if needed and appends synthetic rows in one transaction.
pub async fn seed_database(options: &SeedOptions) -> Result<SeedReport> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let connect_options = SqliteConnectOptions::new()
        .filename(&options.path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await?;

    let mut tx = pool.begin().await?;
    sqlx::query(CREATE_USERS).execute(&mut *tx).await?;
    sqlx::query(CREATE_ORDERS).execute(&mut *tx).await?;

    let mut users_inserted = 0;
    for i in 0..options.users {
        let result = sqlx::query(
            "INSERT INTO users (name, email, age, signup_date) VALUES (?, ?, ?, ?)",
        )
        .bind(format!("User {}", i))
        .bind(format!("user{}@example.com", i))
        .bind(rng.random_range(18..90_i64))
        .bind(day(i))
        .execute(&mut *tx)
        .await?;
        users_inserted += result.rows_affected();
    }

    let max_user_id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM users")
        .fetch_one(&mut *tx)
        .await?;

    let mut orders_inserted = 0;
    if options.orders > 0 {
        let max_user_id = max_user_id.ok_or_else(|| BrowserError::InvalidConfigValueError {
            field: "orders".to_string(),
            value: options.orders.to_string(),
            reason: "Orders need at least one user to reference".to_string(),
        })?;

        for i in 0..options.orders {
            let product = PRODUCTS.choose(&mut rng).copied().unwrap_or(PRODUCTS[0]);
            let amount: f64 = rng.random_range(10.0..500.0);
            let result = sqlx::query(
                "INSERT INTO orders (user_id, product_name, amount, order_date) VALUES (?, ?, ?, ?)",
            )
            .bind(rng.random_range(1..=max_user_id))
            .bind(product)
            .bind((amount * 100.0).round() / 100.0)
            .bind(day(i))
            .execute(&mut *tx)
            .await?;
            orders_inserted += result.rows_affected();
        }
    }

    tx.commit().await?;
    pool.close().await;

    tracing::info!(
        "🌱 Seeded {}: {} users, {} orders",
        options.path.display(),
        users_inserted,
        orders_inserted
    );

    Ok(SeedReport {
        users_inserted,
        orders_inserted,
    })
}
