//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap rusqlite errors and convert
//! them to the database-agnostic error types defined in `voldesk_core`.

use thiserror::Error;
use voldesk_core::errors::{DatabaseError, Error};

/// Storage-specific errors.
///
/// These errors are internal to the storage layer and are converted to
/// `voldesk_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Invalid table name for symbol '{0}'")]
    InvalidTableName(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Database I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database task failed: {0}")]
    TaskFailed(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => Error::Database(DatabaseError::ConnectionFailed(e)),
            StorageError::QueryFailed(rusqlite::Error::QueryReturnedNoRows) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::InvalidTableName(symbol) => Error::Database(DatabaseError::QueryFailed(
                format!("Invalid table name for symbol '{}'", symbol),
            )),
            StorageError::InvalidValue(e) => Error::Database(DatabaseError::Internal(e)),
            StorageError::Io(e) => Error::Database(DatabaseError::ConnectionFailed(e.to_string())),
            StorageError::TaskFailed(e) => {
                Error::Database(DatabaseError::TransactionFailed(e))
            }
        }
    }
}

/// Extension trait for converting rusqlite Results to core Results.
///
/// Provides `.into_core()` on any `Result<T, rusqlite::Error>`, going
/// through `StorageError`.
pub trait IntoCore<T> {
    fn into_core(self) -> voldesk_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, rusqlite::Error> {
    fn into_core(self) -> voldesk_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> voldesk_core::Result<T> {
        self.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rows_maps_to_not_found() {
        let err: Error = StorageError::QueryFailed(rusqlite::Error::QueryReturnedNoRows).into();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[test]
    fn test_invalid_table_name_message() {
        let err: Error = StorageError::InvalidTableName("BRK.B".to_string()).into();
        assert!(err.to_string().contains("BRK.B"));
    }
}
