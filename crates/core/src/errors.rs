//! Core error types for voldesk.
//!
//! This module defines database-agnostic error types. SQLite errors are
//! converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use voldesk_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for voldesk.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No option data collected for {0}")]
    NoOptionData(String),
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open the database file.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Schema creation failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Errors raised by the instrument catalog.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{0} is already in the catalog")]
    Duplicate(String),

    #[error("{0} is not in the catalog")]
    UnknownInstrument(String),

    #[error("Security type {0} cannot be registered")]
    UnsupportedSecType(String),

    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),
}

/// Errors raised by the derived analytics.
#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    /// Not enough clean rows to fit a model.
    #[error("Insufficient data: {available} rows, {required} required")]
    InsufficientData { available: usize, required: usize },

    /// The regression design matrix has no unique solution.
    #[error("Regression is singular")]
    SingularMatrix,

    /// A statistical distribution could not be built.
    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}
