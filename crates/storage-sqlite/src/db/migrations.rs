//! Schema of the shared observation tables.
//!
//! Daily bar tables are per instrument and created lazily by the bar store.

use rusqlite::Connection;

use crate::errors::StorageError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS greeks_observations (
    date TEXT,
    ticker TEXT,
    type TEXT,
    strike REAL,
    delta REAL,
    gamma REAL,
    vega REAL,
    theta REAL,
    iv REAL,
    undPrice REAL,
    PRIMARY KEY (date, ticker, type, strike)
);

CREATE TABLE IF NOT EXISTS gex_observations (
    date TEXT,
    ticker TEXT,
    expiry TEXT,
    strike REAL,
    type TEXT,
    openInterest INTEGER,
    gamma REAL,
    contractMultiplier INTEGER,
    undPrice REAL
);

CREATE INDEX IF NOT EXISTS idx_gex_observations_ticker_expiry
    ON gex_observations (ticker, expiry);
"#;

/// Creates the shared tables. Safe to run on every open.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| StorageError::MigrationFailed(e.to_string()))
}
