//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all gateway operations
//! - [`FailureClass`]: Classification deciding whether a failure aborts an operation

mod failure;

pub use failure::FailureClass;

use thiserror::Error;

use crate::models::SecType;

/// Errors that can occur while talking to the broker gateway.
///
/// Each variant is classified into a [`FailureClass`] via the
/// [`failure_class`](Self::failure_class) method, which callers use to decide
/// whether a failure inside a loop is skipped or aborts the whole operation.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The gateway process could not be reached.
    #[error("Gateway unreachable at {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// No venue confirmed the instrument under any of the attempted security types.
    #[error("Unable to resolve {symbol} (tried {})", format_attempted(.attempted))]
    ResolutionFailed {
        /// The symbol that failed to resolve
        symbol: String,
        /// Security types tried, in order
        attempted: Vec<SecType>,
    },

    /// A contract lookup returned no details.
    #[error("No contract details for {0}")]
    ContractNotFound(String),

    /// The gateway returned no bars for the requested range.
    #[error("No data for date range")]
    NoDataForRange,

    /// The option chain of the underlying lists no expirations.
    #[error("No option expirations found for {0}")]
    NoExpirations(String),

    /// The requested expiry is not part of the listed chain.
    #[error("Expiry {expiry} is not listed for {symbol}")]
    ExpiryNotListed { symbol: String, expiry: String },

    /// No spot price could be read from the live quote.
    #[error("Unable to obtain a spot price for {0}")]
    NoSpotPrice(String),

    /// A subscribed quote did not populate before the deadline.
    #[error("Timed out after {waited_ms} ms waiting for {operation}")]
    Timeout { operation: String, waited_ms: u64 },

    /// The gateway answered with an error.
    #[error("Gateway error: {message}")]
    GatewayError { message: String },

    /// The gateway answered with a payload that could not be decoded.
    #[error("Invalid gateway response: {message}")]
    InvalidResponse { message: String },

    /// A network error occurred while communicating with the gateway.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

fn format_attempted(attempted: &[SecType]) -> String {
    if attempted.is_empty() {
        return "nothing".to_string();
    }
    attempted
        .iter()
        .map(|t| t.code())
        .collect::<Vec<_>>()
        .join(", ")
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// - [`FailureClass::Connection`]: the gateway is unreachable, surfaced once
    /// - [`FailureClass::Resolution`]: abort this instrument, siblings unaffected
    /// - [`FailureClass::Empty`]: expected absence of data, skip and continue
    /// - [`FailureClass::Fatal`]: abort the operation
    ///
    /// # Examples
    ///
    /// ```
    /// use voldesk_market_data::errors::{FailureClass, MarketDataError};
    ///
    /// let error = MarketDataError::NoDataForRange;
    /// assert_eq!(error.failure_class(), FailureClass::Empty);
    ///
    /// let error = MarketDataError::ContractNotFound("ZZZZ".to_string());
    /// assert_eq!(error.failure_class(), FailureClass::Resolution);
    /// ```
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::ConnectionFailed { .. } => FailureClass::Connection,

            Self::ResolutionFailed { .. } | Self::ContractNotFound(_) => FailureClass::Resolution,

            Self::NoDataForRange | Self::Timeout { .. } => FailureClass::Empty,

            Self::NoExpirations(_)
            | Self::ExpiryNotListed { .. }
            | Self::NoSpotPrice(_)
            | Self::GatewayError { .. }
            | Self::InvalidResponse { .. } => FailureClass::Fatal,

            Self::Network(e) => {
                if e.is_connect() {
                    FailureClass::Connection
                } else {
                    FailureClass::Fatal
                }
            }
        }
    }
}
