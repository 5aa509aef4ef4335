use async_trait::async_trait;

use super::gex_model::GammaObservation;
use crate::errors::Result;

/// Storage of gamma snapshots.
#[async_trait]
pub trait GexStore: Send + Sync {
    /// Observations of `symbol` for `expiry`, ordered by date then strike.
    fn load_observations(&self, symbol: &str, expiry: &str) -> Result<Vec<GammaObservation>>;

    /// Symbols with at least one stored observation, sorted.
    fn symbols(&self) -> Result<Vec<String>>;

    /// Append observations. Existing rows are never replaced.
    async fn append_observations(&self, rows: &[GammaObservation]) -> Result<usize>;
}
