use log::info;
use serde::Serialize;

use voldesk_market_data::{normalize_symbol, Instrument};

use super::catalog_seed::seed_instruments;
use crate::errors::{CatalogError, Result};

/// The set of instruments the importer and samplers may operate on.
///
/// An explicit value owned by the caller. It is extended through
/// [`register`](Self::register), which consumes the catalog and returns the
/// updated one; nothing is persisted.
#[derive(Clone, Debug, Serialize)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl InstrumentCatalog {
    /// Catalog holding the built-in instruments.
    pub fn seeded() -> Self {
        Self {
            instruments: seed_instruments(),
        }
    }

    pub fn empty() -> Self {
        Self {
            instruments: Vec::new(),
        }
    }

    /// Add a manually entered instrument.
    ///
    /// The symbol is normalised and exchange/currency upper-cased. Rejects
    /// blank fields, option security types and symbols already present.
    pub fn register(mut self, instrument: Instrument) -> Result<Self> {
        let symbol = normalize_symbol(&instrument.symbol);
        if symbol.is_empty() {
            return Err(CatalogError::MissingField("symbol").into());
        }
        let exchange = instrument.exchange.trim().to_ascii_uppercase();
        if exchange.is_empty() {
            return Err(CatalogError::MissingField("exchange").into());
        }
        let currency = instrument.currency.trim().to_ascii_uppercase();
        if currency.is_empty() {
            return Err(CatalogError::MissingField("currency").into());
        }
        if !instrument.sec_type.is_underlying() {
            return Err(CatalogError::UnsupportedSecType(instrument.sec_type.to_string()).into());
        }
        if self.contains(&symbol) {
            return Err(CatalogError::Duplicate(symbol).into());
        }

        let mut registered = Instrument::new(&symbol, instrument.sec_type, exchange, currency);
        registered.contract_month = instrument.contract_month;
        registered.trading_class = instrument.trading_class;
        registered.multiplier = instrument.multiplier;

        info!("Registered {} {} on {}", registered.sec_type, symbol, registered.exchange);
        self.instruments.push(registered);
        Ok(self)
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol == symbol)
    }

    /// Like [`get`](Self::get) but an unknown symbol is an error.
    pub fn require(&self, symbol: &str) -> Result<&Instrument> {
        self.get(symbol)
            .ok_or_else(|| CatalogError::UnknownInstrument(symbol.to_string()).into())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    /// Symbols in catalog order.
    pub fn symbols(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.symbol.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
