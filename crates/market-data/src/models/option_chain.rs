use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::ContractId;

/// Gateway date format for option expirations.
pub const EXPIRY_FORMAT: &str = "%Y%m%d";

/// Option-chain parameters for one exchange/trading class of an underlying.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainParams {
    pub exchange: String,
    pub underlying_con_id: ContractId,
    #[serde(default)]
    pub trading_class: String,
    #[serde(default)]
    pub multiplier: String,
    /// Expirations as `YYYYMMDD`
    #[serde(default)]
    pub expirations: Vec<String>,
    #[serde(default)]
    pub strikes: Vec<f64>,
}

impl OptionChainParams {
    /// Parsed expirations, sorted ascending. Unparseable entries are dropped.
    pub fn expiry_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .expirations
            .iter()
            .filter_map(|e| NaiveDate::parse_from_str(e, EXPIRY_FORMAT).ok())
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}

/// Formats a date in gateway expiry format.
pub fn format_expiry(date: NaiveDate) -> String {
    date.format(EXPIRY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_dates_sorted_and_deduplicated() {
        let params = OptionChainParams {
            expirations: vec![
                "20251219".to_string(),
                "20251017".to_string(),
                "bogus".to_string(),
                "20251017".to_string(),
            ],
            ..Default::default()
        };
        let dates = params.expiry_dates();
        assert_eq!(dates.len(), 2);
        assert_eq!(format_expiry(dates[0]), "20251017");
        assert_eq!(format_expiry(dates[1]), "20251219");
    }
}
