//! Voldesk Market Data Crate
//!
//! This crate talks to the broker market-data gateway on behalf of the
//! voldesk importer, samplers and GEX fetcher.
//!
//! # Overview
//!
//! The market data crate provides:
//! - A session trait relaying the gateway call contract (details, bars, quotes, chains)
//! - An HTTP binding to the local gateway bridge
//! - Contract resolution for stocks, indices and futures
//! - A settle helper that polls live quotes until populated, with a deadline
//! - An error taxonomy deciding what aborts and what is skipped
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |     Symbol       | --> | normalize_symbol |
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | ContractResolver |  (exchange table, STK -> IND fallback)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | MarketDataSession|  (one per operation)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  Bars / Tickers  |  (await_ticker + SettlePolicy)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Instrument`] - Catalog instrument (symbol, type, exchange, currency)
//! - [`Contract`] - Gateway contract, query or qualified
//! - [`Bar`] - Daily OHLC bar
//! - [`TickerSnapshot`] - Live quote state with model Greeks
//! - [`OptionChainParams`] - Expirations and strikes of an option chain

pub mod errors;
pub mod models;
pub mod resolver;
pub mod session;

pub use errors::{FailureClass, MarketDataError};

pub use models::{
    format_expiry, Bar, BarRequest, Contract, ContractId, Currency, Exchange, Instrument,
    ModelGreeks, OptionChainParams, OptionRight, SecType, TickerId, TickerSnapshot, WhatToShow,
    EXPIRY_FORMAT,
};

pub use resolver::{normalize_symbol, ContractResolver, FuturesSelection};

pub use session::http::{GatewayConfig, HttpGateway};
pub use session::{await_ticker, MarketDataSession, SessionConnector, SettlePolicy};
