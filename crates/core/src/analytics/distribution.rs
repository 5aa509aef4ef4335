//! Yearly distribution of daily returns over fixed bins.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use voldesk_market_data::Bar;

use super::returns::{daily_returns, weekday_sessions, ReturnMode};

/// Upper edges (inclusive) of the absolute return bins; the last bin is open.
const ABSOLUTE_EDGES: [f64; 7] = [0.005, 0.01, 0.015, 0.02, 0.03, 0.05, 0.10];

pub const ABSOLUTE_LABELS: [&str; 8] = [
    "0% to 0.5%",
    "0.5% to 1%",
    "1% to 1.5%",
    "1.5% to 2%",
    "2% to 3%",
    "3% to 5%",
    "5% to 10%",
    "> 10%",
];

/// Lower edges (inclusive) of the signed return bins after the first.
const SIGNED_EDGES: [f64; 15] = [
    -0.10, -0.05, -0.03, -0.02, -0.015, -0.01, -0.005, 0.0, 0.005, 0.01, 0.015, 0.02, 0.03, 0.05,
    0.10,
];

pub const SIGNED_LABELS: [&str; 16] = [
    "< -10%",
    "-10% to -5%",
    "-5% to -3%",
    "-3% to -2%",
    "-2% to -1.5%",
    "-1.5% to -1%",
    "-1% to -0.5%",
    "-0.5% to 0%",
    "0% to 0.5%",
    "0.5% to 1%",
    "1% to 1.5%",
    "1.5% to 2%",
    "2% to 3%",
    "3% to 5%",
    "5% to 10%",
    "> 10%",
];

/// Bin index of a return under the absolute or signed scheme.
pub fn bin_index(ret: f64, signed: bool) -> Option<usize> {
    if !ret.is_finite() {
        return None;
    }
    if signed {
        Some(SIGNED_EDGES.iter().filter(|&&edge| ret >= edge).count())
    } else {
        let magnitude = ret.abs();
        Some(ABSOLUTE_EDGES.iter().filter(|&&edge| magnitude > edge).count())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRow {
    pub year: i32,
    /// Counts aligned with the distribution labels
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDistribution {
    pub mode: ReturnMode,
    pub signed: bool,
    pub labels: Vec<String>,
    pub rows: Vec<DistributionRow>,
}

impl ReturnDistribution {
    pub fn total(&self) -> usize {
        self.rows.iter().flat_map(|r| r.counts.iter()).sum()
    }
}

/// Count weekday returns per year and bin.
pub fn return_distribution(bars: &[Bar], mode: ReturnMode, signed: bool) -> ReturnDistribution {
    let labels: &[&str] = if signed { &SIGNED_LABELS } else { &ABSOLUTE_LABELS };
    let mut years: BTreeMap<i32, Vec<usize>> = BTreeMap::new();

    for ret in daily_returns(&weekday_sessions(bars), mode) {
        if let Some(bin) = bin_index(ret.value, signed) {
            years
                .entry(ret.date.year())
                .or_insert_with(|| vec![0; labels.len()])[bin] += 1;
        }
    }

    ReturnDistribution {
        mode,
        signed,
        labels: labels.iter().map(|l| l.to_string()).collect(),
        rows: years
            .into_iter()
            .map(|(year, counts)| DistributionRow { year, counts })
            .collect(),
    }
}
