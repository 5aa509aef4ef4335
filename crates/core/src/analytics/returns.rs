//! Daily returns and rolling statistics.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use voldesk_market_data::Bar;

use crate::errors::{Error, ValidationError};
use crate::utils::time_utils;

/// How a daily return is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnMode {
    /// Close over previous close
    #[default]
    C2C,
    /// Close over same-day open
    O2C,
}

impl fmt::Display for ReturnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnMode::C2C => f.write_str("C2C"),
            ReturnMode::O2C => f.write_str("O2C"),
        }
    }
}

impl FromStr for ReturnMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C2C" => Ok(ReturnMode::C2C),
            "O2C" => Ok(ReturnMode::O2C),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown return mode '{}', expected C2C or O2C",
                other
            )))),
        }
    }
}

/// Transformation applied to a daily return before averaging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnMeasure {
    #[default]
    Squared,
    Absolute,
    Signed,
}

impl ReturnMeasure {
    pub fn apply(self, ret: f64) -> f64 {
        match self {
            ReturnMeasure::Squared => ret * ret,
            ReturnMeasure::Absolute => ret.abs(),
            ReturnMeasure::Signed => ret,
        }
    }
}

impl FromStr for ReturnMeasure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squared" | "sq" => Ok(ReturnMeasure::Squared),
            "absolute" | "abs" => Ok(ReturnMeasure::Absolute),
            "signed" => Ok(ReturnMeasure::Signed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown return measure '{}', expected squared, absolute or signed",
                other
            )))),
        }
    }
}

/// Return of one session, as a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily returns of `bars`, which must be sorted by date.
///
/// A close-to-close series starts at the second bar. Returns that are not
/// finite (zero previous close or open) are dropped.
pub fn daily_returns(bars: &[Bar], mode: ReturnMode) -> Vec<DailyReturn> {
    let returns: Vec<DailyReturn> = match mode {
        ReturnMode::C2C => bars
            .windows(2)
            .map(|pair| DailyReturn {
                date: pair[1].date,
                value: pair[1].close / pair[0].close - 1.0,
            })
            .collect(),
        ReturnMode::O2C => bars
            .iter()
            .map(|bar| DailyReturn {
                date: bar.date,
                value: (bar.close - bar.open) / bar.open,
            })
            .collect(),
    };
    returns.into_iter().filter(|r| r.value.is_finite()).collect()
}

/// Bars sorted by date, one per date, Monday to Friday only.
pub fn weekday_sessions(bars: &[Bar]) -> Vec<Bar> {
    let mut sessions: Vec<Bar> = bars
        .iter()
        .filter(|b| time_utils::is_weekday(b.date))
        .cloned()
        .collect();
    sessions.sort_by_key(|b| b.date);
    sessions.dedup_by_key(|b| b.date);
    sessions
}

/// Trailing mean over `window` values; `None` until the window is full.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        out.push((i + 1 >= window).then(|| sum / window as f64));
    }
    out
}

/// Trailing sample standard deviation over `window` values.
///
/// `None` until the window is full or while it contains a missing value.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window < 2 || i + 1 < window {
                return None;
            }
            let slice: Option<Vec<f64>> = values[i + 1 - window..=i].iter().copied().collect();
            slice.map(|w| sample_std(&w))
        })
        .collect()
}

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}
