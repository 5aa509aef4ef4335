//! Market data models
//!
//! This module contains the core data types exchanged with the broker gateway:
//! - `types` - Type aliases for common identifiers (Exchange, Currency, ContractId, TickerId)
//! - `instrument` - Catalog instrument descriptor (Instrument) and SecType enum
//! - `contract` - Gateway contracts (queries and qualified results) and OptionRight
//! - `bar` - Daily bars and the historical bar request
//! - `ticker` - Live quote snapshots and model Greeks
//! - `option_chain` - Option-chain parameters (expirations, strikes)

mod bar;
mod contract;
mod instrument;
mod option_chain;
mod ticker;
mod types;

pub use bar::{Bar, BarRequest, WhatToShow};
pub use contract::{Contract, OptionRight};
pub use instrument::{Instrument, SecType};
pub use option_chain::{format_expiry, OptionChainParams, EXPIRY_FORMAT};
pub use ticker::{ModelGreeks, TickerSnapshot};
pub use types::{ContractId, Currency, Exchange, TickerId};
