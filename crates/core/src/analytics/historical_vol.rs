//! Close-to-close historical volatility with an at-the-money IV overlay.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use voldesk_market_data::{Bar, OptionRight};

use super::returns::{rolling_std, weekday_sessions};
use crate::constants::{TRADING_DAYS_PER_YEAR, VOLATILITY_WINDOWS};
use crate::greeks::GreeksObservation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalVolRow {
    pub date: NaiveDate,
    pub close: f64,
    /// Annualised volatility in percent, aligned with the series windows
    pub hv: Vec<Option<f64>>,
    /// At-the-money implied volatility in percent
    pub atm_iv: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalVolatility {
    pub windows: Vec<usize>,
    pub rows: Vec<HistoricalVolRow>,
}

/// Per date, the implied vol (×100) of the CALL whose delta is closest to 0.5.
pub fn atm_iv_by_date(observations: &[GreeksObservation]) -> BTreeMap<NaiveDate, f64> {
    let mut best: BTreeMap<NaiveDate, &GreeksObservation> = BTreeMap::new();
    for obs in observations.iter().filter(|o| o.right == OptionRight::Call) {
        best.entry(obs.date)
            .and_modify(|current| {
                if obs.atm_distance() < current.atm_distance() {
                    *current = obs;
                }
            })
            .or_insert(obs);
    }
    best.into_iter()
        .map(|(date, obs)| (date, obs.implied_vol * 100.0))
        .collect()
}

/// Historical volatility of weekday sessions in `bars`.
///
/// When `today` has no bar, a row carrying the last close is appended so
/// that the latest IV reading is shown.
pub fn historical_volatility(
    bars: &[Bar],
    observations: &[GreeksObservation],
    today: NaiveDate,
) -> HistoricalVolatility {
    let sessions = weekday_sessions(bars);
    let iv = atm_iv_by_date(observations);

    let mut returns: Vec<Option<f64>> = Vec::with_capacity(sessions.len() + 1);
    returns.push(None);
    returns.extend(sessions.windows(2).map(|pair| {
        let ret = pair[1].close / pair[0].close - 1.0;
        ret.is_finite().then_some(ret)
    }));
    returns.truncate(sessions.len());

    let mut points: Vec<(NaiveDate, f64)> = sessions.iter().map(|b| (b.date, b.close)).collect();
    if let Some(&(last_date, last_close)) = points.last() {
        if last_date < today {
            points.push((today, last_close));
            returns.push(None);
        }
    }

    let annualise = TRADING_DAYS_PER_YEAR.sqrt() * 100.0;
    let hv: Vec<Vec<Option<f64>>> = VOLATILITY_WINDOWS
        .iter()
        .map(|&w| {
            rolling_std(&returns, w)
                .into_iter()
                .map(|s| s.map(|s| s * annualise))
                .collect()
        })
        .collect();

    let rows = points
        .into_iter()
        .enumerate()
        .map(|(i, (date, close))| HistoricalVolRow {
            date,
            close,
            hv: hv.iter().map(|series| series[i]).collect(),
            atm_iv: iv.get(&date).copied(),
        })
        .collect();

    HistoricalVolatility {
        windows: VOLATILITY_WINDOWS.to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn call(date: NaiveDate, delta: f64, iv: f64) -> GreeksObservation {
        GreeksObservation {
            date,
            symbol: "SPX".to_string(),
            right: OptionRight::Call,
            strike: 5700.0,
            delta: Some(delta),
            gamma: None,
            vega: None,
            theta: None,
            implied_vol: iv,
            und_price: 5712.0,
        }
    }

    #[test]
    fn test_atm_iv_uses_calls_closest_to_half_delta() {
        let mut put = call(day(2025, 3, 10), -0.5, 0.30);
        put.right = OptionRight::Put;
        let rows = vec![
            call(day(2025, 3, 10), 0.62, 0.18),
            call(day(2025, 3, 10), 0.47, 0.16),
            put,
        ];
        let iv = atm_iv_by_date(&rows);
        assert_eq!(iv.len(), 1);
        assert!((iv[&day(2025, 3, 10)] - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_defined_once_full() {
        let mut date = day(2025, 1, 6);
        let mut bars = Vec::new();
        for i in 0..8 {
            let close = if i % 2 == 0 { 100.0 } else { 101.0 };
            bars.push(Bar::new(date, close, close, close, close));
            date = time_utils::next_business_day(date);
        }
        let last = bars.last().unwrap().date;
        let hv = historical_volatility(&bars, &[], last);

        assert_eq!(hv.rows.len(), 8);
        // The 5-session window needs five returns, so the sixth session
        assert!(hv.rows[4].hv[0].is_none());
        assert!(hv.rows[5].hv[0].unwrap() > 0.0);
        assert!(hv.rows[7].hv[1].is_none());
    }

    #[test]
    fn test_today_row_carries_iv() {
        let bars = vec![
            Bar::new(day(2025, 3, 6), 100.0, 100.0, 100.0, 100.0),
            Bar::new(day(2025, 3, 7), 100.0, 101.0, 100.0, 101.0),
        ];
        let today = day(2025, 3, 10);
        let hv = historical_volatility(&bars, &[call(today, 0.5, 0.15)], today);

        assert_eq!(hv.rows.len(), 3);
        let last = hv.rows.last().unwrap();
        assert_eq!(last.date, today);
        assert_eq!(last.close, 101.0);
        assert!((last.atm_iv.unwrap() - 15.0).abs() < 1e-9);
        assert!(hv.rows[0].atm_iv.is_none());
    }
}
