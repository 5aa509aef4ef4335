//! Gamma observation models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use voldesk_market_data::OptionRight;

/// Open interest and gamma of one option at the time of a snapshot.
///
/// Append-only: several snapshots of the same option may exist per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaObservation {
    pub date: NaiveDate,
    pub symbol: String,
    /// Expiry as `YYYYMMDD`
    pub expiry: String,
    pub strike: f64,
    pub right: OptionRight,
    pub open_interest: f64,
    pub gamma: f64,
    pub multiplier: f64,
    /// Underlying spot when the snapshot was taken
    pub und_price: f64,
}
