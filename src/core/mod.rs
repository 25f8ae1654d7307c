pub mod browser;
pub mod connection_string;
pub mod navigator;
pub mod render;
pub mod seed;

pub use crate::domain::model::{ColumnInfo, ConnectionSettings, DbKind, RowCap, TablePreview};
pub use crate::domain::ports::Catalog;
pub use crate::utils::error::Result;
