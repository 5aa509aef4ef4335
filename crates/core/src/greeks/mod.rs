//! Option Greeks observations and the daily sampler.

mod greeks_model;
mod greeks_traits;
mod sampler;

pub use greeks_model::{AtmReading, ExpirySelection, GreeksObservation, RefreshOptions};
pub use greeks_traits::GreeksStore;
pub use sampler::GreeksSampler;
