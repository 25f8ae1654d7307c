use crate::core::render::OutputFormat;
use crate::domain::model::{DbKind, RowCap};
use crate::utils::error::{BrowserError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Optional TOML file with connection defaults, e.g. `--config shop.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub connection: Option<ConnectionProfile>,
    pub browser: Option<BrowserProfile>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(rename = "type")]
    pub kind: DbKind,
    pub path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl std::fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserProfile {
    pub row_limit: Option<u32>,
    pub format: Option<OutputFormat>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl Profile {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BrowserError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| BrowserError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PGPASSWORD})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn row_limit(&self) -> Option<u32> {
        self.browser.as_ref().and_then(|b| b.row_limit)
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.browser.as_ref().and_then(|b| b.format)
    }
}

impl Validate for Profile {
    fn validate(&self) -> Result<()> {
        if let Some(connection) = &self.connection {
            if connection.kind.is_file_based() {
                if let Some(path) = &connection.path {
                    validate_path("connection.path", path)?;
                }
            } else {
                if let Some(host) = &connection.host {
                    validate_non_empty_string("connection.host", host)?;
                }
                if let Some(port) = connection.port {
                    validate_range("connection.port", port, 1, u16::MAX)?;
                }
            }
        }

        if let Some(limit) = self.row_limit() {
            RowCap::new(limit)?;
        }

        Ok(())
    }
}
