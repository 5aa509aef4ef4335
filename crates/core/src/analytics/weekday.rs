//! Mean daily move by year and day of the week.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use voldesk_market_data::Bar;

use super::returns::{daily_returns, weekday_sessions, ReturnMode};

pub const WEEKDAY_LABELS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayRow {
    pub year: i32,
    /// Mean move in percent, Monday to Friday; `None` without sessions
    pub means: [Option<f64>; 5],
}

/// Year × weekday mean of `|ret| × 100`, or `ret × 100` when `signed`.
pub fn weekday_heatmap(bars: &[Bar], mode: ReturnMode, signed: bool) -> Vec<WeekdayRow> {
    let mut cells: BTreeMap<i32, [(f64, usize); 5]> = BTreeMap::new();

    for ret in daily_returns(&weekday_sessions(bars), mode) {
        let column = ret.date.weekday().num_days_from_monday() as usize;
        if column >= WEEKDAY_LABELS.len() {
            continue;
        }
        let value = if signed { ret.value } else { ret.value.abs() } * 100.0;
        let cell = &mut cells.entry(ret.date.year()).or_default()[column];
        cell.0 += value;
        cell.1 += 1;
    }

    cells
        .into_iter()
        .map(|(year, row)| WeekdayRow {
            year,
            means: row.map(|(sum, n)| (n > 0).then(|| sum / n as f64)),
        })
        .collect()
}
