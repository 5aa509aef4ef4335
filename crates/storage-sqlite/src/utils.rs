//! Helpers shared by the SQLite stores.

use chrono::NaiveDate;

use crate::errors::StorageError;
use voldesk_core::constants::DATE_FORMAT;

/// Suffix of per-instrument bar tables.
pub const SERIES_SUFFIX: &str = "_data";

/// Table of an instrument's daily bars: `<lowercased symbol>_data`.
///
/// Symbols are restricted to ASCII letters, digits and `_` so the name can
/// be interpolated into SQL; it is still quoted where used.
pub fn series_table(symbol: &str) -> Result<String, StorageError> {
    let valid = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StorageError::InvalidTableName(symbol.to_string()));
    }
    Ok(format!("{}{}", symbol.to_ascii_lowercase(), SERIES_SUFFIX))
}

/// Symbol of a bar table name, or `None` for other tables.
pub fn series_symbol(table: &str) -> Option<String> {
    table
        .strip_suffix(SERIES_SUFFIX)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_uppercase())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a stored date, tolerating a trailing time part.
pub fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|e| StorageError::InvalidValue(format!("date '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_table_names() {
        assert_eq!(series_table("SPX").unwrap(), "spx_data");
        assert_eq!(series_table("ES_FUT").unwrap(), "es_fut_data");
        assert!(series_table("BRK.B").is_err());
        assert!(series_table("spx; DROP TABLE x").is_err());
        assert!(series_table("").is_err());
    }

    #[test]
    fn test_series_symbol() {
        assert_eq!(series_symbol("spx_data").as_deref(), Some("SPX"));
        assert_eq!(series_symbol("greeks_observations"), None);
        assert_eq!(series_symbol("_data"), None);
    }

    #[test]
    fn test_parse_date_with_time_part() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(parse_date("2025-03-10").unwrap(), expected);
        assert_eq!(parse_date("2025-03-10 00:00:00").unwrap(), expected);
        assert!(parse_date("10/03/2025").is_err());
    }
}
