//! HAR-RV: heterogeneous autoregressive model of realized variance.
//!
//! Next-day realized variance is regressed by OLS with intercept on the
//! day's variance and its 5 and 22 session rolling means. The fit yields
//! an in-sample series, a next-business-day point forecast, and a
//! confidence interval of the mean prediction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use voldesk_market_data::Bar;

use super::returns::{daily_returns, rolling_mean, ReturnMode};
use crate::constants::{HAR_CONFIDENCE, HAR_MIN_ROWS};
use crate::errors::{AnalyticsError, Result};
use crate::utils::time_utils;

const WEEKLY_WINDOW: usize = 5;
const MONTHLY_WINDOW: usize = 22;
const REGRESSORS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarCoefficients {
    pub intercept: f64,
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

/// Next-business-day forecast, as variance and as volatility in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarForecast {
    pub date: NaiveDate,
    pub variance: f64,
    pub lower: f64,
    pub upper: f64,
    pub vol: f64,
    pub lower_vol: f64,
    pub upper_vol: f64,
}

/// One in-sample session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarRvPoint {
    pub date: NaiveDate,
    pub realized_variance: f64,
    pub fitted_variance: f64,
    pub realized_vol: f64,
    pub fitted_vol: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarRvFit {
    pub mode: ReturnMode,
    pub coefficients: HarCoefficients,
    /// Rows the regression was trained on
    pub observations: usize,
    pub forecast: HarForecast,
    pub points: Vec<HarRvPoint>,
}

/// `sqrt(variance) × 100`; non-positive variance maps to 0.
pub fn variance_to_vol(variance: f64) -> f64 {
    if variance > 0.0 {
        variance.sqrt() * 100.0
    } else {
        0.0
    }
}

/// Fit HAR-RV on date-sorted `bars`.
pub fn fit_har_rv(bars: &[Bar], mode: ReturnMode) -> Result<HarRvFit> {
    let returns = daily_returns(bars, mode);
    let rv: Vec<f64> = returns.iter().map(|r| r.value * r.value).collect();
    let rv5 = rolling_mean(&rv, WEEKLY_WINDOW);
    let rv22 = rolling_mean(&rv, MONTHLY_WINDOW);

    let clean: Vec<(NaiveDate, [f64; REGRESSORS])> = returns
        .iter()
        .enumerate()
        .filter_map(|(i, r)| Some((r.date, [1.0, rv[i], rv5[i]?, rv22[i]?])))
        .collect();

    if clean.len() < HAR_MIN_ROWS {
        return Err(AnalyticsError::InsufficientData {
            available: clean.len(),
            required: HAR_MIN_ROWS,
        }
        .into());
    }

    let x: Vec<[f64; REGRESSORS]> = clean[..clean.len() - 1].iter().map(|(_, x)| *x).collect();
    let y: Vec<f64> = clean[1..].iter().map(|(_, x)| x[1]).collect();
    let fit = ols(&x, &y)?;

    let dof = x.len() - REGRESSORS;
    let sigma2 = fit.ssr / dof as f64;
    let t = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|e| AnalyticsError::Distribution(e.to_string()))?
        .inverse_cdf(1.0 - (1.0 - HAR_CONFIDENCE) / 2.0);

    let (last_date, x0) = clean[clean.len() - 1];
    let variance = fit.predict(&x0);
    let se = (sigma2 * quadratic_form(&fit.xtx_inv, &x0)).max(0.0).sqrt();
    let lower = variance - t * se;
    let upper = variance + t * se;

    let points = clean
        .iter()
        .map(|(date, x)| {
            let fitted = fit.predict(x);
            HarRvPoint {
                date: *date,
                realized_variance: x[1],
                fitted_variance: fitted,
                realized_vol: variance_to_vol(x[1]),
                fitted_vol: variance_to_vol(fitted),
            }
        })
        .collect();

    Ok(HarRvFit {
        mode,
        coefficients: HarCoefficients {
            intercept: fit.beta[0],
            daily: fit.beta[1],
            weekly: fit.beta[2],
            monthly: fit.beta[3],
        },
        observations: x.len(),
        forecast: HarForecast {
            date: time_utils::next_business_day(last_date),
            variance,
            lower,
            upper,
            vol: variance_to_vol(variance),
            lower_vol: variance_to_vol(lower),
            upper_vol: variance_to_vol(upper),
        },
        points,
    })
}

type Matrix = [[f64; REGRESSORS]; REGRESSORS];

struct OlsFit {
    beta: [f64; REGRESSORS],
    xtx_inv: Matrix,
    ssr: f64,
}

impl OlsFit {
    fn predict(&self, x: &[f64; REGRESSORS]) -> f64 {
        x.iter().zip(self.beta.iter()).map(|(a, b)| a * b).sum()
    }
}

/// Least squares through the normal equations.
fn ols(x: &[[f64; REGRESSORS]], y: &[f64]) -> std::result::Result<OlsFit, AnalyticsError> {
    let mut xtx = [[0.0; REGRESSORS]; REGRESSORS];
    let mut xty = [0.0; REGRESSORS];
    for (row, target) in x.iter().zip(y) {
        for i in 0..REGRESSORS {
            xty[i] += row[i] * target;
            for j in 0..REGRESSORS {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let xtx_inv = invert(xtx)?;
    let mut beta = [0.0; REGRESSORS];
    for (i, b) in beta.iter_mut().enumerate() {
        *b = (0..REGRESSORS).map(|j| xtx_inv[i][j] * xty[j]).sum();
    }

    let mut fit = OlsFit {
        beta,
        xtx_inv,
        ssr: 0.0,
    };
    fit.ssr = x
        .iter()
        .zip(y)
        .map(|(row, target)| (target - fit.predict(row)).powi(2))
        .sum();
    Ok(fit)
}

/// Gauss-Jordan inversion of the symmetric positive semi-definite `X'X`.
///
/// A pivot that keeps less than 1e-12 of its column's sum of squares marks
/// a regressor that is a linear combination of the previous ones.
fn invert(mut a: Matrix) -> std::result::Result<Matrix, AnalyticsError> {
    let diagonal: Vec<f64> = (0..REGRESSORS).map(|i| a[i][i]).collect();

    let mut inv = [[0.0; REGRESSORS]; REGRESSORS];
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..REGRESSORS {
        let p = a[col][col];
        if !p.is_finite() || p <= diagonal[col] * 1e-12 || p <= 0.0 {
            return Err(AnalyticsError::SingularMatrix);
        }
        for j in 0..REGRESSORS {
            a[col][j] /= p;
            inv[col][j] /= p;
        }
        for row in 0..REGRESSORS {
            let factor = a[row][col];
            if row == col || factor == 0.0 {
                continue;
            }
            for j in 0..REGRESSORS {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Ok(inv)
}

fn quadratic_form(m: &Matrix, x: &[f64; REGRESSORS]) -> f64 {
    (0..REGRESSORS)
        .map(|i| (0..REGRESSORS).map(|j| x[i] * m[i][j] * x[j]).sum::<f64>())
        .sum()
}
