//! Static venue table for well-known symbols.
//!
//! Known futures and indices map to their canonical (exchange, currency);
//! every other symbol defaults to smart routing in USD and is classified
//! by probing the gateway.

use crate::models::SecType;

/// Exchange and currency used when a symbol is not in the table.
pub const DEFAULT_VENUE: (&str, &str) = ("SMART", "USD");

/// `(symbol, security type, exchange, currency)` for every known symbol.
pub const KNOWN_SYMBOLS: &[(&str, SecType, &str, &str)] = &[
    // Indices
    ("SPX", SecType::Index, "CBOE", "USD"),
    ("NDX", SecType::Index, "NASDAQ", "USD"),
    ("RUT", SecType::Index, "RUSSELL", "USD"),
    ("DJX", SecType::Index, "CBOE", "USD"),
    ("VIX", SecType::Index, "CBOE", "USD"),
    ("VXN", SecType::Index, "CBOE", "USD"),
    ("RVX", SecType::Index, "CBOE", "USD"),
    ("VXD", SecType::Index, "CBOE", "USD"),
    ("OVX", SecType::Index, "CBOE", "USD"),
    ("ESTX50", SecType::Index, "EUREX", "EUR"),
    ("DAX", SecType::Index, "EUREX", "EUR"),
    ("V2TX", SecType::Index, "EUREX", "EUR"),
    ("CAC40", SecType::Index, "MONEP", "EUR"),
    // Futures
    ("ES", SecType::Future, "CME", "USD"),
    ("NQ", SecType::Future, "GLOBEX", "USD"),
    ("RTY", SecType::Future, "GLOBEX", "USD"),
    ("YM", SecType::Future, "CBOT", "USD"),
    ("GC", SecType::Future, "COMEX", "USD"),
    ("SI", SecType::Future, "COMEX", "USD"),
    ("CL", SecType::Future, "NYMEX", "USD"),
    ("6E", SecType::Future, "CME", "USD"),
    ("M6E", SecType::Future, "CME", "USD"),
    ("6J", SecType::Future, "CME", "USD"),
    ("M6J", SecType::Future, "CME", "USD"),
];

/// How a symbol is looked up at the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolClass {
    Future,
    Index,
    /// Not in the table: try stock, then index
    Unknown,
}

/// Canonical (exchange, currency) for a symbol.
pub fn venue_for(symbol: &str) -> (&'static str, &'static str) {
    KNOWN_SYMBOLS
        .iter()
        .find(|(s, ..)| *s == symbol)
        .map(|(_, _, exchange, currency)| (*exchange, *currency))
        .unwrap_or(DEFAULT_VENUE)
}

pub fn classify(symbol: &str) -> SymbolClass {
    match KNOWN_SYMBOLS.iter().find(|(s, ..)| *s == symbol) {
        Some((_, SecType::Future, ..)) => SymbolClass::Future,
        Some((_, SecType::Index, ..)) => SymbolClass::Index,
        _ => SymbolClass::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_venues() {
        assert_eq!(venue_for("SPX"), ("CBOE", "USD"));
        assert_eq!(venue_for("CAC40"), ("MONEP", "EUR"));
        assert_eq!(venue_for("NQ"), ("GLOBEX", "USD"));
    }

    #[test]
    fn test_unknown_symbol_defaults_to_smart() {
        assert_eq!(venue_for("AAPL"), DEFAULT_VENUE);
        assert_eq!(classify("AAPL"), SymbolClass::Unknown);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("ES"), SymbolClass::Future);
        assert_eq!(classify("M6J"), SymbolClass::Future);
        assert_eq!(classify("VIX"), SymbolClass::Index);
    }
}
