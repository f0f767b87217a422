//! SQLite-backed key-value provider.
//!
//! # Invariants
//! - One row per key in `kv_entries`; `set` upserts.
//! - A unit of work runs inside `BEGIN IMMEDIATE ... COMMIT`, so concurrent
//!   connections to the same file serialize their read-modify-write cycles.

use super::{KvResult, KvStore};
use crate::db::{open_db, open_db_in_memory, DbResult};
use log::{error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteKvStore {
    conn: Connection,
    in_unit: bool,
}

impl SqliteKvStore {
    /// Opens a store file, applying migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection that already went through `open_db`.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            in_unit: false,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn begin_unit(&mut self) -> KvResult<()> {
        // A unit abandoned by a panic leaves its transaction open.
        if !self.conn.is_autocommit() {
            warn!("event=kv_begin module=kv status=recovered action=rollback");
            self.conn.execute_batch("ROLLBACK;")?;
        }
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        self.in_unit = true;
        Ok(())
    }

    fn finish_unit(&mut self) -> KvResult<()> {
        if !self.in_unit {
            return Ok(());
        }
        self.in_unit = false;
        if let Err(err) = self.conn.execute_batch("COMMIT;") {
            error!("event=kv_commit module=kv status=error error={err}");
            if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK;") {
                warn!("event=kv_rollback module=kv status=error error={rollback_err}");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::kv::KvStore;

    #[test]
    fn upsert_overwrites_value() {
        let mut kv = SqliteKvStore::open_in_memory().unwrap();
        kv.set("slot", "[1]").unwrap();
        kv.set("slot", "[1,2]").unwrap();
        assert_eq!(kv.get("slot").unwrap().as_deref(), Some("[1,2]"));

        let rows: i64 = kv
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn unit_commits_writes() {
        let mut kv = SqliteKvStore::open_in_memory().unwrap();
        kv.begin_unit().unwrap();
        kv.set("a", "1").unwrap();
        kv.finish_unit().unwrap();
        assert!(kv.connection().is_autocommit());
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn begin_rolls_back_an_abandoned_unit() {
        let mut kv = SqliteKvStore::open_in_memory().unwrap();
        kv.begin_unit().unwrap();
        kv.set("lost", "1").unwrap();
        kv.begin_unit().unwrap();
        kv.finish_unit().unwrap();
        assert_eq!(kv.get("lost").unwrap(), None);
    }

    #[test]
    fn finish_without_begin_is_noop() {
        let mut kv = SqliteKvStore::open_in_memory().unwrap();
        kv.finish_unit().unwrap();
        kv.remove("missing").unwrap();
        assert_eq!(kv.get("missing").unwrap(), None);
    }
}
