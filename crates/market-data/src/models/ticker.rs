use serde::{Deserialize, Serialize};

/// Model-computed option Greeks attached to a live quote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelGreeks {
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
    #[serde(default)]
    pub implied_vol: Option<f64>,
    #[serde(default)]
    pub und_price: Option<f64>,
}

/// Current state of a live quote subscription.
///
/// Fields fill in asynchronously after the subscription is opened;
/// a freshly opened ticker may have every field missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    #[serde(default)]
    pub last: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub open_interest: Option<f64>,
    #[serde(default)]
    pub model_greeks: Option<ModelGreeks>,
}

/// A price is usable when present, finite and non-zero.
fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

impl TickerSnapshot {
    /// First usable value among last, close, bid, ask.
    pub fn spot(&self) -> Option<f64> {
        usable(self.last)
            .or_else(|| usable(self.close))
            .or_else(|| usable(self.bid))
            .or_else(|| usable(self.ask))
    }

    /// Last trade, else previous close. Used for one-shot snapshots.
    pub fn last_or_close(&self) -> Option<f64> {
        usable(self.last).or_else(|| usable(self.close))
    }

    /// Model Greeks, once implied volatility has been computed.
    pub fn greeks_with_iv(&self) -> Option<&ModelGreeks> {
        self.model_greeks
            .as_ref()
            .filter(|g| g.implied_vol.is_some_and(|iv| iv.is_finite()))
    }

    /// Model Greeks, once gamma has been computed.
    pub fn greeks_with_gamma(&self) -> Option<&ModelGreeks> {
        self.model_greeks
            .as_ref()
            .filter(|g| g.gamma.is_some_and(|gamma| gamma.is_finite()))
    }
}
