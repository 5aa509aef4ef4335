use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::{Currency, Exchange};

/// Gateway security type.
///
/// Instruments are limited to the underlying types (stock, index, future);
/// the option types only appear on contracts built by the samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecType {
    #[serde(rename = "STK")]
    Stock,
    #[serde(rename = "IND")]
    Index,
    #[serde(rename = "FUT")]
    Future,
    #[serde(rename = "OPT")]
    Option,
    #[serde(rename = "FOP")]
    FutureOption,
}

impl SecType {
    /// Gateway code for this security type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Stock => "STK",
            Self::Index => "IND",
            Self::Future => "FUT",
            Self::Option => "OPT",
            Self::FutureOption => "FOP",
        }
    }

    /// Whether instruments of this type can be stored in the catalog.
    pub fn is_underlying(&self) -> bool {
        matches!(self, Self::Stock | Self::Index | Self::Future)
    }

    /// Option security type written on the chain of this underlying.
    pub fn option_type(&self) -> SecType {
        match self {
            Self::Future => Self::FutureOption,
            _ => Self::Option,
        }
    }
}

impl fmt::Display for SecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SecType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STK" | "STOCK" => Ok(Self::Stock),
            "IND" | "INDEX" => Ok(Self::Index),
            "FUT" | "FUTURE" => Ok(Self::Future),
            "OPT" | "OPTION" => Ok(Self::Option),
            "FOP" => Ok(Self::FutureOption),
            other => Err(format!("Unknown security type: {}", other)),
        }
    }
}

/// A tradable instrument as described in the catalog.
///
/// Immutable once created; looked up by `symbol` for every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Canonical uppercase symbol without venue suffix
    pub symbol: String,
    pub sec_type: SecType,
    pub exchange: Exchange,
    pub currency: Currency,
    /// Contract month for futures (`YYYYMM` or `YYYYMMDD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_month: Option<String>,
    /// Venue trading class, narrows contract lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
}

impl Instrument {
    pub fn stock(symbol: &str, exchange: &'static str, currency: &'static str) -> Self {
        Self::new(symbol, SecType::Stock, exchange, currency)
    }

    pub fn index(symbol: &str, exchange: &'static str, currency: &'static str) -> Self {
        Self::new(symbol, SecType::Index, exchange, currency)
    }

    pub fn future(symbol: &str, exchange: &'static str, currency: &'static str) -> Self {
        Self::new(symbol, SecType::Future, exchange, currency)
    }

    /// Instrument on a venue only known at runtime (manual entry).
    pub fn new(
        symbol: &str,
        sec_type: SecType,
        exchange: impl Into<Exchange>,
        currency: impl Into<Currency>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            sec_type,
            exchange: exchange.into(),
            currency: currency.into(),
            contract_month: None,
            trading_class: None,
            multiplier: None,
        }
    }

    /// Set the contract month (futures only).
    pub fn with_contract_month(mut self, month: impl Into<String>) -> Self {
        self.contract_month = Some(month.into());
        self
    }

    pub fn with_trading_class(mut self, trading_class: impl Into<String>) -> Self {
        self.trading_class = Some(trading_class.into());
        self
    }

    pub fn with_multiplier(mut self, multiplier: impl Into<String>) -> Self {
        self.multiplier = Some(multiplier.into());
        self
    }
}
