//! Database file management.
//!
//! The store keeps no open connection: every operation opens the file,
//! works, and drops the connection. Writes run on the blocking pool so
//! they never stall the runtime.

mod migrations;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use rusqlite::{Connection, OpenFlags};

use crate::errors::StorageError;
use voldesk_core::Result;

pub use migrations::run_migrations;

/// Default location of the database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./db/market_data.db";

/// Handle to the SQLite file shared by all stores.
#[derive(Clone, Debug)]
pub struct Database {
    path: Arc<PathBuf>,
}

impl Database {
    /// Creates the parent directory and the shared tables, then returns the handle.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(StorageError::from)?;
                debug!("Created database directory {}", parent.display());
            }
        }

        let db = Self {
            path: Arc::new(path),
        };
        let conn = db.connection()?;
        run_migrations(&conn)?;
        info!("Database ready at {}", db.path.display());
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection to the database file.
    pub fn connection(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Connection::open_with_flags(self.path.as_ref(), flags).map_err(|e| {
            StorageError::ConnectionFailed(format!("{}: {}", self.path.display(), e)).into()
        })
    }

    /// Runs `job` on a fresh connection on the blocking thread pool.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.connection()?;
            job(&mut conn)
        })
        .await
        .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_directory_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("market_data.db");

        let db = Database::init(&path).unwrap();
        assert!(path.exists());

        let conn = db.connection().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'greeks_observations'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        // Reopening an initialised file is a no-op
        Database::init(&path).unwrap();
    }

    #[tokio::test]
    async fn test_exec_runs_on_fresh_connection() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::init(dir.path().join("market_data.db")).unwrap();

        let answer = db
            .exec(|conn| {
                conn.query_row("SELECT 40 + 2", [], |row| row.get::<_, i64>(0))
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
            .unwrap();
        assert_eq!(answer, 42);
    }
}
