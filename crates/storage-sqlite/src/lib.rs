//! SQLite storage implementation for voldesk.
//!
//! Implements the store traits defined in `voldesk-core` on a single
//! SQLite file:
//! - one `<symbol>_data` table of daily bars per instrument
//! - `greeks_observations`, keyed by (date, ticker, type, strike)
//! - `gex_observations`, an append-only log of gamma snapshots
//!
//! ```text
//!   core (domain, traits)
//!           │
//!           ▼
//!   storage-sqlite (this crate)
//!           │
//!           ▼
//!       SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod utils;

// Store implementations
pub mod bars;
pub mod gex;
pub mod greeks;

pub use db::{run_migrations, Database, DEFAULT_DB_PATH};

pub use errors::{IntoCore, StorageError};

pub use bars::SqliteBarStore;
pub use gex::SqliteGexStore;
pub use greeks::SqliteGreeksStore;

// Re-export from voldesk-core for convenience
pub use voldesk_core::errors::{DatabaseError, Error, Result};
