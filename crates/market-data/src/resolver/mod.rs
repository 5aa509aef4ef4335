//! Contract resolution.
//!
//! Converts user symbols and catalog instruments into qualified gateway
//! contracts.
//!
//! # Resolution order
//!
//! ```text
//! symbol ──► exchange table ──┬─► known future ──► futures listing ──► FuturesSelection
//!                             ├─► known index  ──► IND details
//!                             └─► unknown      ──► STK details ──miss──► IND details
//! ```
//!
//! Catalog instruments skip the table: their own exchange, currency and
//! security type are authoritative.

mod contract_resolver;
mod exchange_table;
mod symbol;

pub use contract_resolver::{ContractResolver, FuturesSelection};
pub use exchange_table::{classify, venue_for, SymbolClass, DEFAULT_VENUE, KNOWN_SYMBOLS};
pub use symbol::{normalize_symbol, KNOWN_VENUE_SUFFIXES};
