//! Broker gateway sessions.
//!
//! This module contains:
//! - The `MarketDataSession` trait relaying the gateway call contract
//! - The `SessionConnector` trait that opens one session per operation
//! - The settle helper that awaits live quote data with a deadline
//! - The HTTP binding to the local gateway bridge

mod settle;
mod traits;

pub mod http;

pub use settle::{await_ticker, SettlePolicy};
pub use traits::{MarketDataSession, SessionConnector};
