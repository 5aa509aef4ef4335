//! Realized volatility: a daily return measure and its rolling means.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use voldesk_market_data::Bar;

use super::returns::{daily_returns, rolling_mean, ReturnMeasure, ReturnMode};
use crate::constants::VOLATILITY_WINDOWS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedVolRow {
    pub date: NaiveDate,
    pub close: f64,
    /// The day's measured return, as a fraction
    pub daily: f64,
    /// Rolling means aligned with the series windows
    pub rolling: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedVolSeries {
    pub mode: ReturnMode,
    pub measure: ReturnMeasure,
    pub windows: Vec<usize>,
    pub rows: Vec<RealizedVolRow>,
}

/// Realized volatility of date-sorted `bars` over the standard windows.
pub fn realized_volatility(
    bars: &[Bar],
    mode: ReturnMode,
    measure: ReturnMeasure,
) -> RealizedVolSeries {
    let returns = daily_returns(bars, mode);
    let daily: Vec<f64> = returns.iter().map(|r| measure.apply(r.value)).collect();
    let means: Vec<Vec<Option<f64>>> = VOLATILITY_WINDOWS
        .iter()
        .map(|&w| rolling_mean(&daily, w))
        .collect();

    let closes: HashMap<NaiveDate, f64> = bars.iter().map(|b| (b.date, b.close)).collect();

    let rows = returns
        .iter()
        .enumerate()
        .map(|(i, ret)| RealizedVolRow {
            date: ret.date,
            close: closes.get(&ret.date).copied().unwrap_or(f64::NAN),
            daily: daily[i],
            rolling: means.iter().map(|m| m[i]).collect(),
        })
        .collect();

    RealizedVolSeries {
        mode,
        measure,
        windows: VOLATILITY_WINDOWS.to_vec(),
        rows,
    }
}
