//! Row mapping of `greeks_observations`.

use rusqlite::Row;

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date};
use voldesk_core::greeks::GreeksObservation;
use voldesk_market_data::OptionRight;

/// Column list shared by reads and writes.
pub const GREEKS_COLUMNS: &str = "date, ticker, type, strike, delta, gamma, vega, theta, iv, undPrice";

/// Raw `greeks_observations` row; `option_type` holds "CALL" or "PUT".
#[derive(Debug, Clone, PartialEq)]
pub struct GreeksObservationDB {
    pub date: String,
    pub ticker: String,
    pub option_type: String,
    pub strike: f64,
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,
    pub iv: Option<f64>,
    pub und_price: Option<f64>,
}

impl GreeksObservationDB {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            ticker: row.get(1)?,
            option_type: row.get(2)?,
            strike: row.get(3)?,
            delta: row.get(4)?,
            gamma: row.get(5)?,
            vega: row.get(6)?,
            theta: row.get(7)?,
            iv: row.get(8)?,
            und_price: row.get(9)?,
        })
    }
}

impl From<&GreeksObservation> for GreeksObservationDB {
    fn from(obs: &GreeksObservation) -> Self {
        Self {
            date: format_date(obs.date),
            ticker: obs.symbol.clone(),
            option_type: obs.right.name().to_string(),
            strike: obs.strike,
            delta: obs.delta,
            gamma: obs.gamma,
            vega: obs.vega,
            theta: obs.theta,
            iv: Some(obs.implied_vol),
            und_price: Some(obs.und_price),
        }
    }
}

impl TryFrom<GreeksObservationDB> for GreeksObservation {
    type Error = StorageError;

    fn try_from(db: GreeksObservationDB) -> Result<Self, Self::Error> {
        let right = OptionRight::parse(&db.option_type).ok_or_else(|| {
            StorageError::InvalidValue(format!("option type '{}'", db.option_type))
        })?;
        Ok(Self {
            date: parse_date(&db.date)?,
            symbol: db.ticker,
            right,
            strike: db.strike,
            delta: db.delta,
            gamma: db.gamma,
            vega: db.vega,
            theta: db.theta,
            implied_vol: db.iv.unwrap_or_default(),
            und_price: db.und_price.unwrap_or(f64::NAN),
        })
    }
}
