//! Gamma exposure snapshots.

mod gex_model;
mod gex_service;
mod gex_traits;

pub use gex_model::GammaObservation;
pub use gex_service::GexService;
pub use gex_traits::GexStore;
