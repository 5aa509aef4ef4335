use std::fmt;

use serde::{Deserialize, Serialize};

use super::instrument::{Instrument, SecType};
use super::types::ContractId;

/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    Call,
    Put,
}

impl OptionRight {
    pub const ALL: [OptionRight; 2] = [OptionRight::Call, OptionRight::Put];

    /// Single-letter gateway code ("C" / "P").
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::Put => "P",
        }
    }

    /// Full name as stored in the Greeks table ("CALL" / "PUT").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }

    /// Parses either the letter or the full name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "C" | "CALL" => Some(Self::Call),
            "P" | "PUT" => Some(Self::Put),
            _ => None,
        }
    }
}

impl fmt::Display for OptionRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gateway contract, either a lookup query or a qualified result.
///
/// Queries leave `con_id` unset; qualification fills it along with
/// the canonical fields returned by the venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub con_id: Option<ContractId>,
    pub symbol: String,
    pub sec_type: Option<SecType>,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_trade_date_or_contract_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<OptionRight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_class: Option<String>,
}

impl Contract {
    /// Unqualified query for an underlying.
    pub fn query(symbol: &str, sec_type: SecType, exchange: &str, currency: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            sec_type: Some(sec_type),
            exchange: exchange.to_string(),
            currency: currency.to_string(),
            ..Default::default()
        }
    }

    /// Query built from a catalog instrument.
    pub fn from_instrument(instrument: &Instrument) -> Self {
        let mut contract = Self::query(
            &instrument.symbol,
            instrument.sec_type,
            &instrument.exchange,
            &instrument.currency,
        );
        if instrument.sec_type == SecType::Future {
            contract.last_trade_date_or_contract_month = instrument.contract_month.clone();
        }
        contract.trading_class = instrument.trading_class.clone();
        contract.multiplier = instrument.multiplier.clone();
        contract
    }

    /// Option (or future option) query on this underlying.
    pub fn option_query(
        underlying: &Contract,
        expiry: &str,
        strike: f64,
        right: OptionRight,
        exchange: &str,
    ) -> Self {
        let sec_type = underlying
            .sec_type
            .map(|t| t.option_type())
            .unwrap_or(SecType::Option);
        Self {
            symbol: underlying.symbol.clone(),
            sec_type: Some(sec_type),
            exchange: exchange.to_string(),
            currency: underlying.currency.clone(),
            last_trade_date_or_contract_month: Some(expiry.to_string()),
            strike: Some(strike),
            right: Some(right),
            ..Default::default()
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.con_id.is_some()
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sec_type = self.sec_type.map(|t| t.code()).unwrap_or("?");
        write!(f, "{} {} @{}", sec_type, self.symbol, self.exchange)?;
        if let Some(month) = &self.last_trade_date_or_contract_month {
            write!(f, " {}", month)?;
        }
        if let (Some(strike), Some(right)) = (self.strike, self.right) {
            write!(f, " {}{}", strike, right.letter())?;
        }
        if let Some(id) = self.con_id {
            write!(f, " (conId {})", id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_right_parse() {
        assert_eq!(OptionRight::parse("c"), Some(OptionRight::Call));
        assert_eq!(OptionRight::parse("PUT"), Some(OptionRight::Put));
        assert_eq!(OptionRight::parse("X"), None);
    }

    #[test]
    fn test_future_option_query() {
        let mut es = Contract::query("ES", SecType::Future, "CME", "USD");
        es.con_id = Some(495512563);
        let fop = Contract::option_query(&es, "20251219", 6000.0, OptionRight::Put, "CME");
        assert_eq!(fop.sec_type, Some(SecType::FutureOption));
        assert_eq!(fop.right, Some(OptionRight::Put));
        assert!(!fop.is_qualified());
    }

    #[test]
    fn test_from_instrument_keeps_contract_month_for_futures_only() {
        let gc = Instrument::future("GC", "COMEX", "USD").with_contract_month("202512");
        assert_eq!(
            Contract::from_instrument(&gc).last_trade_date_or_contract_month,
            Some("202512".to_string())
        );

        let spx = Instrument::index("SPX", "CBOE", "USD").with_contract_month("202512");
        assert_eq!(
            Contract::from_instrument(&spx).last_trade_date_or_contract_month,
            None
        );
    }

    #[test]
    fn test_from_instrument_carries_trading_class_and_multiplier() {
        let si = Instrument::future("SI", "COMEX", "USD")
            .with_trading_class("SI")
            .with_multiplier("5000");
        let query = Contract::from_instrument(&si);
        assert_eq!(query.trading_class.as_deref(), Some("SI"));
        assert_eq!(query.multiplier.as_deref(), Some("5000"));

        let gc = Contract::from_instrument(&Instrument::future("GC", "COMEX", "USD"));
        assert_eq!(gc.trading_class, None);
        assert_eq!(gc.multiplier, None);
    }

    #[test]
    fn test_display() {
        let mut spx = Contract::query("SPX", SecType::Index, "CBOE", "USD");
        spx.con_id = Some(416904);
        assert_eq!(spx.to_string(), "IND SPX @CBOE (conId 416904)");
    }
}
