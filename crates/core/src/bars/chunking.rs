//! Resume point and request chunking of the history import.

use chrono::{Days, NaiveDate, NaiveDateTime, TimeDelta};

use crate::constants::{CHUNK_DAYS, HISTORY_EPOCH};

/// First date of the import epoch.
pub fn history_epoch() -> NaiveDate {
    let (y, m, d) = HISTORY_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// First date not yet stored: the day after `latest`, or the epoch when nothing is stored.
pub fn resume_point(latest: Option<NaiveDate>) -> NaiveDate {
    latest
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .unwrap_or_else(history_epoch)
}

/// Splits `[start, end)` into consecutive windows of at most [`CHUNK_DAYS`] days.
///
/// Windows are contiguous, each start is inclusive and each end exclusive;
/// the last window ends exactly at `end`. An empty or inverted interval
/// yields no window.
pub fn date_chunks(start: NaiveDateTime, end: NaiveDateTime) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let step = TimeDelta::days(CHUNK_DAYS);
    let mut chunks = Vec::new();
    let mut current = start;
    while current < end {
        let chunk_end = (current + step).min(end);
        chunks.push((current, chunk_end));
        current = chunk_end;
    }
    chunks
}
