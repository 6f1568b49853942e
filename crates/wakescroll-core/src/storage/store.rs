//! SQLite-backed durable key-value store.
//!
//! Every durable piece of state in Wake Scroll lives under a string key in
//! a single `kv` table: scalar counters as integer strings, logs as JSON
//! arrays. The connection sits behind a mutex, so all writes are serialized
//! through one writer, and multi-key updates run inside a SQLite transaction
//! via [`Store::with_txn`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::{Result, StorageError};

use super::data_dir;

/// String-keyed get/set/remove over string values.
///
/// Implemented by [`Store`] (each call takes the writer lock) and by the
/// transaction handle passed to [`Store::with_txn`].
pub trait Kv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Durable key-value store over SQLite.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open the store at `<data_dir>/wakescroll.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("wakescroll.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Run `f` against this store inside a single SQLite transaction.
    ///
    /// The writer lock is held for the duration, so overlapping multi-key
    /// updates cannot interleave. The transaction commits when `f` returns
    /// `Ok` and rolls back otherwise.
    pub fn with_txn<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&dyn Kv) -> Result<R>,
    {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(StorageError::from)?;
        let txn = Txn { conn: &conn };
        match f(&txn) {
            Ok(value) => {
                conn.execute_batch("COMMIT").map_err(StorageError::from)?;
                Ok(value)
            }
            Err(err) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(err)
            }
        }
    }
}

impl Kv for Store {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        kv_get(&conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        kv_set(&conn, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        kv_remove(&conn, key)
    }
}

/// Transaction handle handed to [`Store::with_txn`] closures.
struct Txn<'a> {
    conn: &'a Connection,
}

impl Kv for Txn<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        kv_get(self.conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        kv_set(self.conn, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        kv_remove(self.conn, key)
    }
}

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>, StorageError> {
    let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn kv_set(conn: &Connection, key: &str, value: &str) -> Result<(), StorageError> {
    debug!(key, len = value.len(), "kv set");
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn kv_remove(conn: &Connection, key: &str) -> Result<(), StorageError> {
    conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_remove() {
        let store = Store::open_memory().unwrap();
        assert!(store.get("missing").unwrap().is_none());

        store.set("greeting", "hello").unwrap();
        assert_eq!(store.get("greeting").unwrap().unwrap(), "hello");

        store.set("greeting", "bye").unwrap();
        assert_eq!(store.get("greeting").unwrap().unwrap(), "bye");

        store.remove("greeting").unwrap();
        assert!(store.get("greeting").unwrap().is_none());
    }

    #[test]
    fn txn_commits_on_ok() {
        let store = Store::open_memory().unwrap();
        store
            .with_txn(|kv| {
                kv.set("a", "1")?;
                kv.set("b", "2")?;
                Ok(())
            })
            .unwrap();
        assert_eq!(store.get("a").unwrap().unwrap(), "1");
        assert_eq!(store.get("b").unwrap().unwrap(), "2");
    }

    #[test]
    fn txn_rolls_back_on_err() {
        let store = Store::open_memory().unwrap();
        store.set("a", "before").unwrap();

        let result: Result<()> = store.with_txn(|kv| {
            kv.set("a", "after")?;
            Err(crate::error::CoreError::Custom("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.get("a").unwrap().unwrap(), "before");
    }
}
