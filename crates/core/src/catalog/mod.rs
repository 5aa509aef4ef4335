//! Instrument catalog.

mod catalog_model;
mod catalog_seed;

pub use catalog_model::InstrumentCatalog;
