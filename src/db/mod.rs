//! SQLite access: the database handle, the schema reset and the
//! request-scoped connection.

pub mod models;
pub mod queries;

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub use models::{Post, User};

/// Drops and recreates every table
pub const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the database file. Cheap to clone; connections are opened on demand.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new connection with foreign keys enforced
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    /// Clear the existing data and create new tables
    pub fn init_db(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!("Initialized database at {}", self.path.display());
        Ok(())
    }
}

/// Connection scoped to a single request.
///
/// Nothing is opened until the first query; later queries in the same
/// request reuse the connection. It is closed by [`RequestDb::close`] at
/// teardown, or when the last clone is dropped.
#[derive(Clone)]
pub struct RequestDb {
    inner: Arc<RequestDbInner>,
}

struct RequestDbInner {
    database: Database,
    conn: Mutex<Option<Connection>>,
}

impl RequestDb {
    pub fn new(database: Database) -> Self {
        Self {
            inner: Arc::new(RequestDbInner {
                database,
                conn: Mutex::new(None),
            }),
        }
    }

    /// Run `f` against the request's connection, opening it if needed
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let mut guard = self
            .inner
            .conn
            .lock()
            .map_err(|e| Error::Other(format!("DB lock poisoned: {}", e)))?;

        if guard.is_none() {
            debug!("Opening request connection to {}", self.inner.database.path().display());
            *guard = Some(self.inner.database.connect()?);
        }

        let conn = guard
            .as_ref()
            .ok_or_else(|| Error::Other("request connection unavailable".to_string()))?;
        Ok(f(conn)?)
    }

    pub fn is_open(&self) -> bool {
        self.inner
            .conn
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Close the connection if one was opened. Safe to call more than once.
    pub fn close(&self) {
        let conn = match self.inner.conn.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => return,
        };
        if let Some(conn) = conn {
            debug!("Closing request connection");
            if let Err((_, e)) = conn.close() {
                warn!("Failed to close request connection: {}", e);
            }
        }
    }
}

impl Drop for RequestDbInner {
    fn drop(&mut self) {
        if let Ok(slot) = self.conn.get_mut() {
            if slot.take().is_some() {
                debug!("Request connection released on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fresh_db(dir: &TempDir) -> Database {
        let db = Database::new(dir.path().join("nested").join("test.sqlite"));
        db.init_db().unwrap();
        db
    }

    #[test]
    fn test_init_db_creates_parent_and_tables() {
        let dir = TempDir::new().unwrap();
        let db = fresh_db(&dir);
        assert!(db.path().exists());

        let conn = db.connect().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('user', 'post')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_init_db_wipes_existing_data() {
        let dir = TempDir::new().unwrap();
        let db = fresh_db(&dir);
        {
            let conn = db.connect().unwrap();
            let id = queries::create_user(&conn, "alice", "h").unwrap().unwrap();
            queries::create_post(&conn, "t", "", id).unwrap();
        }

        db.init_db().unwrap();

        let conn = db.connect().unwrap();
        assert!(queries::get_user_by_username(&conn, "alice").unwrap().is_none());
        assert!(queries::list_posts(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_request_db_is_lazy_and_reused() {
        let dir = TempDir::new().unwrap();
        let request_db = RequestDb::new(fresh_db(&dir));
        assert!(!request_db.is_open());

        request_db
            .with_conn(|conn| conn.execute("INSERT INTO user (username, password) VALUES ('a', 'h')", []))
            .unwrap();
        assert!(request_db.is_open());

        // Same connection: last_insert_rowid survives between calls
        let rowid = request_db.with_conn(|conn| Ok(conn.last_insert_rowid())).unwrap();
        assert_eq!(rowid, 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let request_db = RequestDb::new(fresh_db(&dir));

        // Never opened
        request_db.close();
        assert!(!request_db.is_open());

        request_db.with_conn(|conn| queries::list_posts(conn)).unwrap();
        request_db.close();
        request_db.close();
        assert!(!request_db.is_open());
    }

    #[test]
    fn test_clones_share_one_connection() {
        let dir = TempDir::new().unwrap();
        let request_db = RequestDb::new(fresh_db(&dir));
        let clone = request_db.clone();

        clone.with_conn(|conn| queries::list_posts(conn)).unwrap();
        assert!(request_db.is_open());
        request_db.close();
        assert!(!clone.is_open());
    }
}
