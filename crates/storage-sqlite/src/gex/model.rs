//! Row mapping of `gex_observations`.

use rusqlite::Row;

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date};
use voldesk_core::gex::GammaObservation;
use voldesk_market_data::OptionRight;

pub const GEX_COLUMNS: &str =
    "date, ticker, expiry, strike, type, openInterest, gamma, contractMultiplier, undPrice";

/// Raw `gex_observations` row; `option_type` holds "C" or "P".
#[derive(Debug, Clone, PartialEq)]
pub struct GammaObservationDB {
    pub date: String,
    pub ticker: String,
    pub expiry: String,
    pub strike: f64,
    pub option_type: String,
    pub open_interest: Option<f64>,
    pub gamma: Option<f64>,
    pub contract_multiplier: Option<f64>,
    pub und_price: Option<f64>,
}

impl GammaObservationDB {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            ticker: row.get(1)?,
            expiry: row.get(2)?,
            strike: row.get(3)?,
            option_type: row.get(4)?,
            open_interest: row.get(5)?,
            gamma: row.get(6)?,
            contract_multiplier: row.get(7)?,
            und_price: row.get(8)?,
        })
    }
}

impl From<&GammaObservation> for GammaObservationDB {
    fn from(obs: &GammaObservation) -> Self {
        Self {
            date: format_date(obs.date),
            ticker: obs.symbol.clone(),
            expiry: obs.expiry.clone(),
            strike: obs.strike,
            option_type: obs.right.letter().to_string(),
            open_interest: Some(obs.open_interest),
            gamma: Some(obs.gamma),
            contract_multiplier: Some(obs.multiplier),
            und_price: Some(obs.und_price),
        }
    }
}

impl TryFrom<GammaObservationDB> for GammaObservation {
    type Error = StorageError;

    fn try_from(db: GammaObservationDB) -> Result<Self, Self::Error> {
        let right = OptionRight::parse(&db.option_type).ok_or_else(|| {
            StorageError::InvalidValue(format!("option type '{}'", db.option_type))
        })?;
        Ok(Self {
            date: parse_date(&db.date)?,
            symbol: db.ticker,
            expiry: db.expiry,
            strike: db.strike,
            right,
            open_interest: db.open_interest.unwrap_or_default(),
            gamma: db.gamma.unwrap_or_default(),
            multiplier: db.contract_multiplier.unwrap_or_default(),
            und_price: db.und_price.unwrap_or(f64::NAN),
        })
    }
}
