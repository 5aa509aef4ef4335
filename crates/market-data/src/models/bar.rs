use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One day's open/high/low/close for an instrument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }
}

/// Price series requested from the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhatToShow {
    Trades,
}

/// Historical bar request, mirroring the gateway call contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRequest {
    /// End of the requested window (exclusive)
    pub end: NaiveDateTime,
    /// Window length, e.g. "365 D"
    pub duration: String,
    /// Bar size, e.g. "1 day"
    pub bar_size: String,
    pub what_to_show: WhatToShow,
    /// Regular trading hours only
    pub use_rth: bool,
}

impl BarRequest {
    /// Daily trade bars for `[start, end)`, regular hours only.
    pub fn daily(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let seconds = (end - start).num_seconds().max(0);
        // Partial days round up so the window always covers `start`.
        let days = (seconds + 86_399) / 86_400;
        Self {
            end,
            duration: format!("{} D", days.max(1)),
            bar_size: "1 day".to_string(),
            what_to_show: WhatToShow::Trades,
            use_rth: true,
        }
    }
}
