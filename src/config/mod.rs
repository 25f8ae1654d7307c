pub mod cli;
pub mod profile;

use crate::core::render::OutputFormat;
use crate::domain::model::{ConnectionSettings, DbKind, RowCap};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use profile::Profile;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "db-visualizer")]
#[command(about = "Browse tables of a SQLite, PostgreSQL or MySQL database from the terminal")]
pub struct CliConfig {
    /// Database type: sqlite, postgres or mysql
    #[arg(short = 't', long = "db-type")]
    pub db_type: Option<DbKind>,

    /// SQLite database file
    #[arg(long)]
    pub path: Option<String>,

    /// Pick the SQLite file with the interactive file browser
    #[arg(long, conflicts_with = "path")]
    pub browse: bool,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(short, long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Database name (servers only)
    #[arg(short, long)]
    pub database: Option<String>,

    /// TOML profile with connection defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print schema and rows of this table, then exit
    #[arg(long)]
    pub table: Option<String>,

    /// Rows to fetch (10-1000)
    #[arg(short, long)]
    pub limit: Option<u32>,

    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

/// Connection fields gathered so far; prompts fill in whatever is still missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConnection {
    pub kind: Option<DbKind>,
    pub path: Option<String>,
    pub browse: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl PartialConnection {
    /// Complete settings when no prompt is needed.
    pub fn complete(&self) -> Option<ConnectionSettings> {
        match self.kind? {
            DbKind::Sqlite => self.path.as_ref().map(ConnectionSettings::sqlite),
            kind => {
                let database = self.database.as_ref()?;
                let mut settings = ConnectionSettings::server(kind, database.clone());
                if let Some(host) = &self.host {
                    settings.host = host.clone();
                }
                if let Some(port) = self.port {
                    settings.port = port;
                }
                if let Some(user) = &self.user {
                    settings.user = user.clone();
                }
                if let Some(password) = &self.password {
                    settings.password = password.clone();
                }
                Some(settings)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub connection: PartialConnection,
    pub row_cap: RowCap,
    pub format: OutputFormat,
    pub table: Option<String>,
}

fn prefer<T: Clone>(flag: &Option<T>, profile: Option<&Option<T>>) -> Option<T> {
    flag.clone().or_else(|| profile.and_then(|v| v.clone()))
}

impl BrowserConfig {
    /// Flags win over the profile; the profile wins over built-in defaults.
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let profile = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading profile from: {}", path.display());
                let profile = Profile::from_file(path)?;
                profile.validate()?;
                profile
            }
            None => Profile::default(),
        };
        Self::from_parts(cli, &profile)
    }

    pub fn from_parts(cli: &CliConfig, profile: &Profile) -> Result<Self> {
        let conn = profile.connection.as_ref();
        // 型別不同時不沿用 profile 的其他欄位
        let conn = conn.filter(|c| cli.db_type.map_or(true, |kind| kind == c.kind));

        let connection = PartialConnection {
            kind: cli.db_type.or(conn.map(|c| c.kind)),
            path: prefer(&cli.path, conn.map(|c| &c.path)),
            browse: cli.browse,
            host: prefer(&cli.host, conn.map(|c| &c.host)),
            port: prefer(&cli.port, conn.map(|c| &c.port)),
            user: prefer(&cli.user, conn.map(|c| &c.user)),
            password: prefer(&cli.password, conn.map(|c| &c.password)),
            database: prefer(&cli.database, conn.map(|c| &c.database)),
        };

        let row_cap = match cli.limit.or(profile.row_limit()) {
            Some(limit) => RowCap::new(limit)?,
            None => RowCap::default(),
        };

        Ok(Self {
            connection,
            row_cap,
            format: cli.format.or(profile.format()).unwrap_or_default(),
            table: cli.table.clone(),
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit {
            RowCap::new(limit)?;
        }
        if let Some(path) = &self.path {
            crate::utils::validation::validate_path("path", path)?;
        }
        if let Some(port) = self.port {
            crate::utils::validation::validate_range("port", port, 1, u16::MAX)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("db-visualizer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_sqlite_flags_complete_without_prompts() {
        let cli = parse(&["-t", "sqlite", "--path", "example.db", "--limit", "50"]);
        let config = BrowserConfig::from_parts(&cli, &Profile::default()).unwrap();

        assert_eq!(config.row_cap.get(), 50);
        let settings = config.connection.complete().unwrap();
        assert_eq!(settings.kind, DbKind::Sqlite);
        assert_eq!(settings.database, "example.db");
    }

    #[test]
    fn test_server_needs_database_name() {
        let cli = parse(&["--db-type", "postgres", "--host", "db.internal"]);
        let config = BrowserConfig::from_parts(&cli, &Profile::default()).unwrap();
        assert!(config.connection.complete().is_none());

        let cli = parse(&["--db-type", "postgres", "--database", "shop"]);
        let settings = BrowserConfig::from_parts(&cli, &Profile::default())
            .unwrap()
            .connection
            .complete()
            .unwrap();
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 5432);
        assert_eq!(settings.user, "root");
    }

    #[test]
    fn test_flags_override_profile() {
        let profile = Profile::from_toml_str(
            r#"
[connection]
type = "mysql"
host = "profile-host"
user = "reader"
database = "shop"

[browser]
row_limit = 300
format = "json"
"#,
        )
        .unwrap();

        let cli = parse(&["--host", "flag-host", "--format", "csv"]);
        let config = BrowserConfig::from_parts(&cli, &profile).unwrap();
        let settings = config.connection.complete().unwrap();

        assert_eq!(settings.kind, DbKind::MySql);
        assert_eq!(settings.host, "flag-host");
        assert_eq!(settings.user, "reader");
        assert_eq!(settings.port, 3306);
        assert_eq!(config.row_cap.get(), 300);
        assert_eq!(config.format, OutputFormat::Csv);
    }

    #[test]
    fn test_profile_for_other_dialect_is_ignored() {
        let profile = Profile::from_toml_str(
            "[connection]\ntype = \"mysql\"\nhost = \"profile-host\"\ndatabase = \"shop\"\n",
        )
        .unwrap();
        let cli = parse(&["-t", "sqlite"]);
        let config = BrowserConfig::from_parts(&cli, &profile).unwrap();

        assert_eq!(config.connection.kind, Some(DbKind::Sqlite));
        assert!(config.connection.host.is_none());
        assert!(config.connection.complete().is_none());
    }

    #[test]
    fn test_limit_out_of_range_rejected() {
        let cli = parse(&["--limit", "5"]);
        assert!(cli.validate().is_err());
        assert!(BrowserConfig::from_parts(&cli, &Profile::default()).is_err());
    }

    #[test]
    fn test_browse_conflicts_with_path() {
        let result = CliConfig::try_parse_from(["db-visualizer", "--browse", "--path", "x.db"]);
        assert!(result.is_err());
    }
}
