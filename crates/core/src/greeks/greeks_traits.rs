use async_trait::async_trait;
use chrono::NaiveDate;

use super::greeks_model::GreeksObservation;
use crate::errors::Result;

/// Storage of daily option Greeks observations.
#[async_trait]
pub trait GreeksStore: Send + Sync {
    /// Whether any observation exists for `symbol` on `date`.
    fn has_observations(&self, symbol: &str, date: NaiveDate) -> Result<bool>;

    /// All observations of `symbol`, ordered by date then right then strike.
    fn load_observations(&self, symbol: &str) -> Result<Vec<GreeksObservation>>;

    /// Insert or replace observations keyed by (date, symbol, right, strike).
    async fn upsert_observations(&self, rows: &[GreeksObservation]) -> Result<usize>;
}
