//! `SQLite` key-value persistence backend.
//!
//! Stores values in a `kv(key TEXT PRIMARY KEY, value TEXT)` table inside a
//! `SQLite` database file. Each backend instance is bound to one key; several
//! instances may share one database file under different keys.

use crate::storage::traits::{BackendError, BackendResult, PersistenceBackend};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// `SQLite`-backed key-value persistence backend bound to a single key.
pub struct SqliteBackend {
    /// Connection guarded by a mutex for thread-safe access.
    conn: Mutex<Connection>,
    /// The key this instance reads and writes.
    key: String,
    /// Database file path, kept for diagnostics.
    db_path: PathBuf,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `db_path` and binds to `key`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotAvailable` if the database cannot be opened
    /// or the `kv` table cannot be created.
    pub fn open(db_path: impl Into<PathBuf>, key: impl Into<String>) -> BackendResult<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BackendError::NotAvailable(format!("cannot create storage dir: {e}"))
                })?;
            }
        }

        let conn = Connection::open(&db_path)
            .map_err(|e| BackendError::NotAvailable(format!("cannot open database: {e}")))?;

        Self::configure(&conn);

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(|e| BackendError::NotAvailable(format!("cannot create kv table: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            key: key.into(),
            db_path,
        })
    }

    /// Applies WAL mode and a busy timeout for graceful lock contention.
    ///
    /// Pragma results are ignored: `journal_mode` returns the new mode as a
    /// row, which would otherwise surface as an execute error.
    fn configure(conn: &Connection) {
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        let _ = conn.pragma_update(None, "busy_timeout", "5000");
    }

    /// Acquires the connection lock, recovering from poison.
    ///
    /// A poisoned mutex means a previous critical section panicked; the
    /// connection itself is still valid, so we log and continue.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("SQLite mutex was poisoned, recovering");
                poisoned.into_inner()
            },
        }
    }

    /// Returns the key this backend is bound to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the database file path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl PersistenceBackend for SqliteBackend {
    fn read(&self) -> BackendResult<Option<String>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![self.key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| BackendError::io("read_value", e))
    }

    fn write(&self, content: &str) -> BackendResult<()> {
        tracing::debug!(key = %self.key, bytes = content.len(), "writing value row");
        let conn = self.lock();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.key, content],
        )
        .map_err(|e| BackendError::io("write_value", e))?;
        Ok(())
    }

    fn delete(&self) -> BackendResult<()> {
        let conn = self.lock();
        conn.execute("DELETE FROM kv WHERE key = ?1", params![self.key])
            .map_err(|e| BackendError::io("delete_value", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_backend(dir: &TempDir, key: &str) -> SqliteBackend {
        SqliteBackend::open(dir.path().join("kv.db"), key).unwrap()
    }

    #[test]
    fn test_read_absent_is_none() {
        let dir = TempDir::new().unwrap();
        let backend = test_backend(&dir, "my_items");

        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let backend = test_backend(&dir, "my_items");

        backend.write("[\"a\",\"b\"]").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("[\"a\",\"b\"]"));
    }

    #[test]
    fn test_write_replaces_whole_value() {
        let dir = TempDir::new().unwrap();
        let backend = test_backend(&dir, "my_items");

        backend.write("first").unwrap();
        backend.write("second").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let backend = test_backend(&dir, "my_items");

        backend.write("value").unwrap();
        backend.delete().unwrap();
        backend.delete().unwrap();
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = TempDir::new().unwrap();
        let a = test_backend(&dir, "list_a");
        let b = test_backend(&dir, "list_b");

        a.write("alpha").unwrap();
        b.write("beta").unwrap();
        a.delete().unwrap();

        assert!(a.read().unwrap().is_none());
        assert_eq!(b.read().unwrap().as_deref(), Some("beta"));
    }

    #[test]
    fn test_stat_via_default_impl() {
        let dir = TempDir::new().unwrap();
        let backend = test_backend(&dir, "my_items");

        assert!(!backend.exists().unwrap());
        backend.write("abcd").unwrap();

        let info = backend.stat().unwrap();
        assert!(info.exists);
        assert_eq!(info.size, 4);
    }

    #[test]
    fn test_value_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kv.db");

        SqliteBackend::open(&path, "my_items")
            .unwrap()
            .write("persisted")
            .unwrap();

        let reopened = SqliteBackend::open(&path, "my_items").unwrap();
        assert_eq!(reopened.read().unwrap().as_deref(), Some("persisted"));
    }
}
