//! Store location resolution.
//!
//! # Invariants
//! - `JALILGRAM_DB_PATH` wins when set to a non-blank value.
//! - Otherwise the store lives in the platform temp directory.

use crate::db::DbResult;
use crate::kv::SqliteKvStore;
use crate::repo::store::SocialStore;
use std::path::{Path, PathBuf};

/// Environment variable overriding the store file location.
pub const DB_PATH_ENV: &str = "JALILGRAM_DB_PATH";
/// File name used when no override is provided.
pub const DEFAULT_DB_FILE_NAME: &str = "jalilgram.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Resolves the store path from the process environment.
    pub fn from_env() -> Self {
        Self::from_override(std::env::var(DB_PATH_ENV).ok().as_deref())
    }

    fn from_override(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Self::new(raw),
            None => Self::new(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Opens the SQLite-backed store at the configured path.
    pub fn open_store(&self) -> DbResult<SocialStore<SqliteKvStore>> {
        Ok(SocialStore::new(SqliteKvStore::open(&self.db_path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, DEFAULT_DB_FILE_NAME};

    #[test]
    fn blank_override_falls_back_to_temp_dir() {
        let config = StoreConfig::from_override(Some("   "));
        assert!(config.db_path().ends_with(DEFAULT_DB_FILE_NAME));
        assert_eq!(StoreConfig::from_override(None), config);
    }

    #[test]
    fn override_is_trimmed() {
        let config = StoreConfig::from_override(Some(" /data/app.sqlite3 "));
        assert_eq!(config.db_path().to_str(), Some("/data/app.sqlite3"));
    }
}
