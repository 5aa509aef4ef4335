use log::debug;

use voldesk_market_data::{
    await_ticker, Contract, MarketDataError, MarketDataSession, SettlePolicy, TickerSnapshot,
};

/// Subscribes to `contract`, awaits `ready` under `policy`, then cancels the subscription.
///
/// The subscription is cancelled whether or not the value arrived.
pub(crate) async fn sample_ticker<T, F>(
    session: &dyn MarketDataSession,
    contract: &Contract,
    snapshot: bool,
    policy: SettlePolicy,
    operation: &str,
    ready: F,
) -> Result<T, MarketDataError>
where
    F: Fn(&TickerSnapshot) -> Option<T>,
{
    let ticker_id = session.request_market_data(contract, snapshot).await?;
    let result = await_ticker(session, ticker_id, policy, operation, ready).await;
    if let Err(e) = session.cancel_market_data(ticker_id).await {
        debug!("Cancel of {} for {} failed: {}", operation, contract, e);
    }
    result
}
