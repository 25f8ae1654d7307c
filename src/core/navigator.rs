use crate::utils::error::{BrowserError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DB_EXTENSIONS: [&str; 4] = [".db", ".sqlite", ".sqlite3", ".sql"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub dirs: Vec<String>,
    pub db_files: Vec<String>,
}

pub fn is_db_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    DB_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Directory walker used to pick a SQLite file interactively.
#[derive(Debug, Clone)]
pub struct FileNavigator {
    cwd: PathBuf,
}

impl FileNavigator {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self { cwd: start.into() }
    }

    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Moves to the parent directory; stays put at the root.
    pub fn up(&mut self) {
        if let Some(parent) = self.cwd.parent() {
            self.cwd = parent.to_path_buf();
        }
        tracing::debug!("📂 Navigator moved up to {}", self.cwd.display());
    }

    pub fn enter(&mut self, name: &str) -> Result<()> {
        if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) || name == ".." {
            return Err(BrowserError::NavigationError {
                message: format!("'{}' is not a folder name", name),
            });
        }
        let target = self.cwd.join(name);
        if !target.is_dir() {
            return Err(BrowserError::NavigationError {
                message: format!("'{}' is not a folder in {}", name, self.cwd.display()),
            });
        }
        self.cwd = target;
        tracing::debug!("📂 Navigator entered {}", self.cwd.display());
        Ok(())
    }

    pub fn listing(&self) -> Result<Listing> {
        let entries = fs::read_dir(&self.cwd).map_err(|e| self.map_io_error(e))?;

        let mut listing = Listing::default();
        for entry in entries {
            let entry = entry.map_err(|e| self.map_io_error(e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // 跟隨符號連結，與 is_dir / is_file 行為一致
            let path = entry.path();
            if path.is_dir() {
                listing.dirs.push(name);
            } else if path.is_file() && is_db_file(&name) {
                listing.db_files.push(name);
            }
        }
        listing.dirs.sort();
        listing.db_files.sort();
        Ok(listing)
    }

    /// Resolves a file from the current listing to its full path.
    pub fn select(&self, file: &str) -> Result<PathBuf> {
        let listing = self.listing()?;
        if listing.db_files.iter().any(|f| f == file) {
            Ok(self.cwd.join(file))
        } else {
            Err(BrowserError::NavigationError {
                message: format!("'{}' is not a database file in {}", file, self.cwd.display()),
            })
        }
    }

    fn map_io_error(&self, e: std::io::Error) -> BrowserError {
        if e.kind() == ErrorKind::PermissionDenied {
            BrowserError::PermissionDenied {
                path: self.cwd.display().to_string(),
            }
        } else {
            BrowserError::IoError(e)
        }
    }
}
