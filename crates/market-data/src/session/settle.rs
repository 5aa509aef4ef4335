//! Awaiting live quote data.
//!
//! Quotes and model Greeks populate asynchronously after a subscription is
//! opened. Rather than sleeping a fixed time, callers poll the subscription
//! until a condition holds or a deadline passes.

use std::time::Duration;

use log::debug;
use tokio::time::{sleep, Instant};

use crate::errors::MarketDataError;
use crate::models::{TickerId, TickerSnapshot};

use super::traits::MarketDataSession;

/// Deadline and polling cadence for awaiting quote data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlePolicy {
    /// Maximum time to wait for the condition
    pub timeout: Duration,
    /// Delay between two reads of the subscription
    pub poll_interval: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(4),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl SettlePolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Polls `ticker_id` until `ready` returns a value or the policy deadline passes.
///
/// The subscription is read at least once. Returns `Timeout` naming
/// `operation` when the deadline is exceeded.
pub async fn await_ticker<T, F>(
    session: &dyn MarketDataSession,
    ticker_id: TickerId,
    policy: SettlePolicy,
    operation: &str,
    ready: F,
) -> Result<T, MarketDataError>
where
    F: Fn(&TickerSnapshot) -> Option<T>,
{
    let started = Instant::now();
    let deadline = started + policy.timeout;

    loop {
        let snapshot = session.ticker(ticker_id).await?;
        if let Some(value) = ready(&snapshot) {
            debug!(
                "{} ready after {} ms",
                operation,
                started.elapsed().as_millis()
            );
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(MarketDataError::Timeout {
                operation: operation.to_string(),
                waited_ms: policy.timeout.as_millis() as u64,
            });
        }
        sleep(policy.poll_interval.min(deadline - now)).await;
    }
}
