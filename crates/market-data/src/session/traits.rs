//! Gateway session trait definitions.
//!
//! This module defines the `MarketDataSession` trait that every gateway
//! binding implements, and the `SessionConnector` that opens sessions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Bar, BarRequest, Contract, OptionChainParams, TickerId, TickerSnapshot};

/// An open session with the broker gateway.
///
/// The gateway protocol itself is not reimplemented here: implementors only
/// relay these calls. Every higher-level operation opens one session through
/// a [`SessionConnector`], issues its calls sequentially and disconnects.
///
/// # Example
///
/// ```ignore
/// let session = connector.connect().await?;
/// let details = session.contract_details(&query).await?;
/// session.disconnect().await?;
/// ```
#[async_trait]
pub trait MarketDataSession: Send + Sync {
    /// Close the session. Further calls fail.
    async fn disconnect(&self) -> Result<(), MarketDataError>;

    /// Look up every contract matching the query.
    ///
    /// Returns an empty list when the venue knows no such contract.
    async fn contract_details(&self, query: &Contract) -> Result<Vec<Contract>, MarketDataError>;

    /// Qualify a fully specified contract, filling in its contract id.
    ///
    /// Returns `ContractNotFound` when the venue rejects it.
    async fn qualify_contract(&self, contract: &Contract) -> Result<Contract, MarketDataError>;

    /// Fetch daily bars ending at `request.end` over `request.duration`.
    ///
    /// The bars are ordered by date ascending. An empty vector means the
    /// venue had no trading data in the window.
    async fn historical_bars(
        &self,
        contract: &Contract,
        request: &BarRequest,
    ) -> Result<Vec<Bar>, MarketDataError>;

    /// Open a live quote subscription (or a one-shot snapshot).
    async fn request_market_data(
        &self,
        contract: &Contract,
        snapshot: bool,
    ) -> Result<TickerId, MarketDataError>;

    /// Read the current state of a subscription.
    async fn ticker(&self, ticker_id: TickerId) -> Result<TickerSnapshot, MarketDataError>;

    /// Close a subscription.
    async fn cancel_market_data(&self, ticker_id: TickerId) -> Result<(), MarketDataError>;

    /// Option-chain parameters for a qualified underlying.
    ///
    /// `fut_fop_exchange` is the exchange of future options (empty for
    /// stock and index options).
    async fn option_chain_params(
        &self,
        underlying: &Contract,
        fut_fop_exchange: &str,
    ) -> Result<Vec<OptionChainParams>, MarketDataError>;
}

/// Opens gateway sessions.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Connect a new session. No retry.
    async fn connect(&self) -> Result<Box<dyn MarketDataSession>, MarketDataError>;

    /// Whether the gateway accepts connections right now.
    ///
    /// Connects and immediately disconnects; never fails.
    async fn check_connection(&self) -> bool {
        match self.connect().await {
            Ok(session) => {
                let _ = session.disconnect().await;
                true
            }
            Err(_) => false,
        }
    }
}
