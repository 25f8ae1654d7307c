pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{BrowserConfig, CliConfig};

pub use adapters::sql::SqlCatalog;
pub use crate::core::{browser::Browser, navigator::FileNavigator};
pub use domain::model::{ColumnInfo, ConnectionSettings, DbKind, RowCap, TablePreview};
pub use utils::error::{BrowserError, Result};
