//! voldesk core - instruments, history import, option sampling and analytics.
//!
//! This crate holds the domain logic of voldesk. It is storage-agnostic and
//! defines the store traits implemented by the `storage-sqlite` crate; market
//! data flows in through the session traits of `voldesk-market-data`.

pub mod analytics;
pub mod bars;
pub mod catalog;
pub mod constants;
pub mod errors;
pub mod gex;
pub mod greeks;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use catalog::InstrumentCatalog;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
