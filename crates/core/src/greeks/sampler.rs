//! Daily option Greeks sampler.
//!
//! Samples a small strike ladder around spot on one expiry, stores the
//! model Greeks of every option that produced them, and returns the
//! at-the-money implied volatility.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info, warn};

use voldesk_market_data::{
    format_expiry, Contract, ContractResolver, FailureClass, MarketDataError, MarketDataSession,
    ModelGreeks, OptionRight, SecType, SessionConnector, SettlePolicy,
};

use super::greeks_model::{AtmReading, ExpirySelection, GreeksObservation, RefreshOptions};
use super::greeks_traits::GreeksStore;
use crate::constants::{FOP_EXCHANGE, GREEKS_STRIKES_EACH_SIDE, STRIKE_STEP};
use crate::errors::{Error, Result};
use crate::utils::strikes::strike_ladder;
use crate::utils::ticker::sample_ticker;
use crate::utils::time_utils;

pub struct GreeksSampler {
    connector: Arc<dyn SessionConnector>,
    store: Arc<dyn GreeksStore>,
    resolver: ContractResolver,
    settle: SettlePolicy,
}

impl GreeksSampler {
    pub fn new(connector: Arc<dyn SessionConnector>, store: Arc<dyn GreeksStore>) -> Self {
        Self {
            connector,
            store,
            resolver: ContractResolver::new(),
            settle: SettlePolicy::default(),
        }
    }

    pub fn with_settle_policy(mut self, settle: SettlePolicy) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_resolver(mut self, resolver: ContractResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sample today's Greeks of `symbol`.
    ///
    /// Returns `Ok(None)` without connecting when today's observations
    /// already exist and `options.force` is not set.
    pub async fn refresh(&self, symbol: &str, options: RefreshOptions) -> Result<Option<AtmReading>> {
        self.refresh_on(symbol, options, time_utils::today()).await
    }

    /// Sample Greeks of `symbol`, stamping observations with `today`.
    pub async fn refresh_on(
        &self,
        symbol: &str,
        options: RefreshOptions,
        today: NaiveDate,
    ) -> Result<Option<AtmReading>> {
        if !options.force && self.store.has_observations(symbol, today)? {
            info!("{}: Greeks already sampled for {}", symbol, today);
            return Ok(None);
        }

        let session = self.connector.connect().await?;
        let sampled = self
            .sample(session.as_ref(), symbol, options.expiry, today)
            .await;
        if let Err(e) = session.disconnect().await {
            warn!("Failed to close gateway session: {}", e);
        }
        let rows = sampled?;

        if rows.is_empty() {
            return Err(Error::NoOptionData(symbol.to_string()));
        }

        let written = self.store.upsert_observations(&rows).await?;
        info!("{}: {} Greeks observations stored", symbol, written);

        Ok(AtmReading::from_observations(&rows))
    }

    async fn sample(
        &self,
        session: &dyn MarketDataSession,
        symbol: &str,
        expiry: ExpirySelection,
        today: NaiveDate,
    ) -> Result<Vec<GreeksObservation>> {
        let underlying = self.resolver.resolve(session, symbol, None).await?;
        let is_future = underlying.sec_type == Some(SecType::Future);

        let chain_exchange = if is_future { FOP_EXCHANGE } else { "" };
        let chains = session
            .option_chain_params(&underlying, chain_exchange)
            .await?;
        let expirations = chains
            .first()
            .map(|c| c.expiry_dates())
            .unwrap_or_default();
        debug!("{}: {} listed expirations", symbol, expirations.len());

        let expiry = select_expiry(symbol, &expirations, expiry, today)?;
        let expiry = format_expiry(expiry);

        let spot = match sample_ticker(session, &underlying, false, self.settle, "spot price", |t| {
            t.spot()
        })
        .await
        {
            Ok(spot) => spot,
            Err(MarketDataError::Timeout { .. }) => {
                return Err(MarketDataError::NoSpotPrice(symbol.to_string()).into())
            }
            Err(e) => return Err(e.into()),
        };

        let option_exchange = if is_future {
            FOP_EXCHANGE
        } else {
            underlying.exchange.as_str()
        };
        let strikes = strike_ladder(spot, STRIKE_STEP, GREEKS_STRIKES_EACH_SIDE);
        info!(
            "{}: sampling {} on {} strikes around {:.2}",
            symbol,
            expiry,
            strikes.len(),
            spot
        );

        let mut rows = Vec::new();
        for right in OptionRight::ALL {
            for &strike in &strikes {
                let query = Contract::option_query(&underlying, &expiry, strike, right, option_exchange);
                match self.sample_option(session, &query).await {
                    Ok(greeks) => rows.push(GreeksObservation {
                        date: today,
                        symbol: symbol.to_string(),
                        right,
                        strike,
                        delta: greeks.delta,
                        gamma: greeks.gamma,
                        vega: greeks.vega,
                        theta: greeks.theta,
                        implied_vol: greeks.implied_vol.unwrap_or_default(),
                        und_price: spot,
                    }),
                    Err(e) => match e.failure_class() {
                        FailureClass::Connection => return Err(e.into()),
                        FailureClass::Empty | FailureClass::Resolution => {
                            debug!("{}: skipping {} {}: {}", symbol, right, strike, e)
                        }
                        FailureClass::Fatal => {
                            warn!("{}: skipping {} {}: {}", symbol, right, strike, e)
                        }
                    },
                }
            }
        }

        Ok(rows)
    }

    /// Qualify one option and await its model Greeks with implied volatility.
    async fn sample_option(
        &self,
        session: &dyn MarketDataSession,
        query: &Contract,
    ) -> std::result::Result<ModelGreeks, MarketDataError> {
        let details = session.contract_details(query).await?;
        let found = details
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::ContractNotFound(query.to_string()))?;
        let option = session.qualify_contract(&found).await?;

        sample_ticker(session, &option, false, self.settle, "model greeks", |t| {
            t.greeks_with_iv().cloned()
        })
        .await
    }
}

/// Expiry to sample among the listed ones.
fn select_expiry(
    symbol: &str,
    listed: &[NaiveDate],
    selection: ExpirySelection,
    today: NaiveDate,
) -> std::result::Result<NaiveDate, MarketDataError> {
    if listed.is_empty() {
        return Err(MarketDataError::NoExpirations(symbol.to_string()));
    }
    match selection {
        ExpirySelection::Nearest => listed
            .iter()
            .copied()
            .find(|d| *d >= today)
            .ok_or_else(|| MarketDataError::NoExpirations(symbol.to_string())),
        ExpirySelection::Fixed(expiry) => {
            if listed.contains(&expiry) {
                Ok(expiry)
            } else {
                Err(MarketDataError::ExpiryNotListed {
                    symbol: symbol.to_string(),
                    expiry: format_expiry(expiry),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::day;

    #[test]
    fn test_nearest_expiry_on_or_after_today() {
        let listed = vec![day(2025, 3, 7), day(2025, 3, 10), day(2025, 3, 21)];
        assert_eq!(
            select_expiry("SPX", &listed, ExpirySelection::Nearest, day(2025, 3, 10)).unwrap(),
            day(2025, 3, 10)
        );
        assert_eq!(
            select_expiry("SPX", &listed, ExpirySelection::Nearest, day(2025, 3, 11)).unwrap(),
            day(2025, 3, 21)
        );
    }

    #[test]
    fn test_fixed_expiry_must_be_listed() {
        let listed = vec![day(2025, 3, 21)];
        let err = select_expiry(
            "SPX",
            &listed,
            ExpirySelection::Fixed(day(2025, 8, 1)),
            day(2025, 3, 10),
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::ExpiryNotListed { .. }));
        assert_eq!(err.to_string(), "Expiry 20250801 is not listed for SPX");
    }

    #[test]
    fn test_no_expirations() {
        let err = select_expiry("SPX", &[], ExpirySelection::Nearest, day(2025, 3, 10)).unwrap_err();
        assert!(matches!(err, MarketDataError::NoExpirations(_)));
    }
}
