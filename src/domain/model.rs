use crate::utils::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbKind {
    Sqlite,
    #[serde(alias = "postgresql")]
    Postgres,
    MySql,
}

impl DbKind {
    pub const ALL: [DbKind; 3] = [DbKind::Sqlite, DbKind::Postgres, DbKind::MySql];

    pub fn display_name(&self) -> &'static str {
        match self {
            DbKind::Sqlite => "SQLite",
            DbKind::Postgres => "PostgreSQL",
            DbKind::MySql => "MySQL",
        }
    }

    pub fn default_port(&self) -> Option<u16> {
        match self {
            DbKind::Sqlite => None,
            DbKind::Postgres => Some(5432),
            DbKind::MySql => Some(3306),
        }
    }

    pub fn is_file_based(&self) -> bool {
        matches!(self, DbKind::Sqlite)
    }
}

impl fmt::Display for DbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DbKind {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(DbKind::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "mysql" => Ok(DbKind::MySql),
            other => Err(BrowserError::InvalidConfigValueError {
                field: "connection.type".to_string(),
                value: other.to_string(),
                reason: "Supported database types: sqlite, postgres, mysql".to_string(),
            }),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub kind: DbKind,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name, or the file path for SQLite.
    pub database: String,
}

impl ConnectionSettings {
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            kind: DbKind::Sqlite,
            host: String::new(),
            port: 0,
            user: String::new(),
            password: String::new(),
            database: path.into(),
        }
    }

    /// Server connection with the usual defaults (localhost, dialect port, user `root`).
    pub fn server(kind: DbKind, database: impl Into<String>) -> Self {
        Self {
            kind,
            host: "localhost".to_string(),
            port: kind.default_port().unwrap_or(0),
            user: "root".to_string(),
            password: String::new(),
            database: database.into(),
        }
    }
}

// 不輸出密碼
impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePreview {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl TablePreview {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Upper bound on rows fetched by a preview query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RowCap(u32);

impl RowCap {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 1000;
    pub const DEFAULT: u32 = 100;

    pub fn new(value: u32) -> Result<Self> {
        crate::utils::validation::validate_range("row_limit", value, Self::MIN, Self::MAX)?;
        Ok(Self(value))
    }

    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for RowCap {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for RowCap {
    type Error = BrowserError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RowCap> for u32 {
    fn from(cap: RowCap) -> Self {
        cap.0
    }
}

impl fmt::Display for RowCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
