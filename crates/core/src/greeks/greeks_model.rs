//! Option Greeks observation models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use voldesk_market_data::OptionRight;

use crate::constants::ATM_DELTA;

/// Greeks of one option on one day.
///
/// Unique per (date, symbol, right, strike); a later sample of the same
/// key replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreeksObservation {
    pub date: NaiveDate,
    pub symbol: String,
    pub right: OptionRight,
    pub strike: f64,
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,
    pub implied_vol: f64,
    /// Underlying spot when the sample was taken
    pub und_price: f64,
}

impl GreeksObservation {
    /// Distance of the delta from the at-the-money delta; infinite when unknown.
    pub fn atm_distance(&self) -> f64 {
        self.delta
            .filter(|d| d.is_finite())
            .map(|d| (d - ATM_DELTA).abs())
            .unwrap_or(f64::INFINITY)
    }
}

/// The at-the-money reading of a Greeks refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtmReading {
    pub implied_vol: f64,
    pub spot: f64,
    pub strike: f64,
    pub right: OptionRight,
}

impl AtmReading {
    /// Reading of the observation whose delta is closest to 0.5.
    pub fn from_observations(rows: &[GreeksObservation]) -> Option<Self> {
        rows.iter()
            .min_by(|a, b| a.atm_distance().total_cmp(&b.atm_distance()))
            .map(|row| Self {
                implied_vol: row.implied_vol,
                spot: row.und_price,
                strike: row.strike,
                right: row.right,
            })
    }
}

/// Which expiry a Greeks refresh samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpirySelection {
    /// First listed expiry on or after today
    #[default]
    Nearest,
    /// This exact expiry, which must be listed
    Fixed(NaiveDate),
}

/// Options of a Greeks refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Sample even when today's observations already exist
    pub force: bool,
    pub expiry: ExpirySelection,
}
