//! Key-value persistence provider contract.
//!
//! # Responsibility
//! - Define the only storage dependency of the social store: string keys to
//!   string values with get/set/remove.
//! - Provide unit-of-work hooks so a backend can bracket one store
//!   operation in a single transaction.
//!
//! # Invariants
//! - `get` on a missing key returns `Ok(None)`, never an error.
//! - `remove` on a missing key is a no-op.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type KvResult<T> = Result<T, KvError>;

#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Backend refused the operation (e.g. simulated outage).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "key-value store unavailable: {reason}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value backend.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;
    fn remove(&mut self, key: &str) -> KvResult<()>;

    /// Called before a store operation touches any slot.
    fn begin_unit(&mut self) -> KvResult<()> {
        Ok(())
    }

    /// Called after a store operation has written its dirty slots.
    fn finish_unit(&mut self) -> KvResult<()> {
        Ok(())
    }
}
