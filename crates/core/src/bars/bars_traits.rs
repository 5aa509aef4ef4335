//! Daily bar storage trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use voldesk_market_data::Bar;

use crate::errors::Result;

/// Per-instrument daily bar series.
///
/// Each instrument has its own series keyed by date. A series only exists
/// once bars have been written to it or [`ensure_series`](Self::ensure_series)
/// has been called for it.
#[async_trait]
pub trait BarStore: Send + Sync {
    /// Whether a series has been created for `symbol`.
    fn series_exists(&self, symbol: &str) -> Result<bool>;

    /// Latest stored date, `None` when the series is missing or empty.
    fn latest_date(&self, symbol: &str) -> Result<Option<NaiveDate>>;

    /// All bars of a series, ordered by date. Missing series yield an empty vector.
    fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>>;

    /// Symbols with a stored series.
    fn list_series(&self) -> Result<Vec<String>>;

    /// Create the series if it does not exist yet.
    async fn ensure_series(&self, symbol: &str) -> Result<()>;

    /// Insert or replace bars keyed by date. Returns the number of rows written.
    ///
    /// A missing series is created together with the inserts: when the write
    /// fails, no series is left behind.
    async fn upsert_bars(&self, symbol: &str, bars: &[Bar]) -> Result<usize>;
}
