//! Gamma exposure aggregated per strike.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use voldesk_market_data::OptionRight;

use crate::gex::GammaObservation;

/// Exposure of one 1% move per unit of gamma, open interest and multiplier.
const EXPOSURE_SCALE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrikeExposure {
    pub strike: f64,
    /// Call exposure, non-negative for non-negative gamma
    pub calls: f64,
    /// Put exposure, signed negative
    pub puts: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaExposure {
    /// Sorted by strike
    pub strikes: Vec<StrikeExposure>,
    pub net_total: f64,
    /// Sum of `|net|` over strikes
    pub absolute_total: f64,
    pub spot: Option<f64>,
}

/// Exposure of a single observation: `gamma × OI × multiplier × 0.01`, negated for puts.
pub fn observation_exposure(obs: &GammaObservation) -> f64 {
    let exposure = obs.gamma * obs.open_interest * obs.multiplier * EXPOSURE_SCALE;
    match obs.right {
        OptionRight::Call => exposure,
        OptionRight::Put => -exposure,
    }
}

pub fn gamma_exposure(rows: &[GammaObservation]) -> GammaExposure {
    let mut by_strike: BTreeMap<i64, StrikeExposure> = BTreeMap::new();

    for row in rows {
        let entry = by_strike
            .entry(strike_key(row.strike))
            .or_insert(StrikeExposure {
                strike: row.strike,
                calls: 0.0,
                puts: 0.0,
                net: 0.0,
            });
        let exposure = observation_exposure(row);
        match row.right {
            OptionRight::Call => entry.calls += exposure,
            OptionRight::Put => entry.puts += exposure,
        }
        entry.net = entry.calls + entry.puts;
    }

    let strikes: Vec<StrikeExposure> = by_strike.into_values().collect();
    GammaExposure {
        net_total: strikes.iter().map(|s| s.net).sum(),
        absolute_total: strikes.iter().map(|s| s.net.abs()).sum(),
        spot: rows.iter().map(|r| r.und_price).find(|p| p.is_finite()),
        strikes,
    }
}

/// Strikes keyed in thousandths so that float strikes group exactly.
fn strike_key(strike: f64) -> i64 {
    (strike * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(strike: f64, right: OptionRight, oi: f64, gamma: f64) -> GammaObservation {
        GammaObservation {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            symbol: "SPY".to_string(),
            expiry: "20250321".to_string(),
            strike,
            right,
            open_interest: oi,
            gamma,
            multiplier: 100.0,
            und_price: 571.2,
        }
    }

    #[test]
    fn test_mirrored_call_and_put_net_to_zero() {
        let rows = vec![
            obs(570.0, OptionRight::Call, 1200.0, 0.031),
            obs(570.0, OptionRight::Put, 1200.0, 0.031),
        ];
        let gex = gamma_exposure(&rows);
        assert_eq!(gex.strikes.len(), 1);
        assert_eq!(gex.strikes[0].net, 0.0);
        assert_eq!(gex.net_total, 0.0);
        assert_eq!(gex.absolute_total, 0.0);
    }

    #[test]
    fn test_sums_per_strike_sorted() {
        let rows = vec![
            obs(575.0, OptionRight::Put, 100.0, 0.02),
            obs(570.0, OptionRight::Call, 100.0, 0.03),
            obs(570.0, OptionRight::Call, 50.0, 0.02),
        ];
        let gex = gamma_exposure(&rows);

        assert_eq!(gex.strikes.len(), 2);
        assert_eq!(gex.strikes[0].strike, 570.0);
        // 0.03*100*100*0.01 + 0.02*50*100*0.01
        assert!((gex.strikes[0].calls - 4.0).abs() < 1e-9);
        assert!((gex.strikes[1].puts + 2.0).abs() < 1e-9);
        assert!((gex.net_total - 2.0).abs() < 1e-9);
        assert!((gex.absolute_total - 6.0).abs() < 1e-9);
        assert_eq!(gex.spot, Some(571.2));
    }

    #[test]
    fn test_empty_snapshot() {
        let gex = gamma_exposure(&[]);
        assert!(gex.strikes.is_empty());
        assert_eq!(gex.net_total, 0.0);
        assert_eq!(gex.spot, None);
    }
}
