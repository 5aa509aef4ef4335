//! Gamma snapshot fetcher.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info, warn};

use voldesk_market_data::{
    format_expiry, Contract, ContractResolver, FailureClass, MarketDataError, MarketDataSession,
    OptionRight, SecType, SessionConnector, SettlePolicy,
};

use super::gex_model::GammaObservation;
use super::gex_traits::GexStore;
use crate::constants::{
    FOP_EXCHANGE, GEX_CONTRACT_MULTIPLIER, GEX_STRIKES_EACH_SIDE, OPTION_ROUTING_EXCHANGE,
    STRIKE_STEP,
};
use crate::errors::Result;
use crate::utils::strikes::strike_ladder;
use crate::utils::ticker::sample_ticker;
use crate::utils::time_utils;

/// Fetches open interest and gamma over a wide strike ladder on one expiry.
pub struct GexService {
    connector: Arc<dyn SessionConnector>,
    store: Arc<dyn GexStore>,
    resolver: ContractResolver,
    settle: SettlePolicy,
}

impl GexService {
    pub fn new(connector: Arc<dyn SessionConnector>, store: Arc<dyn GexStore>) -> Self {
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

    /// Listed option expirations of `symbol` (`YYYYMMDD`), sorted and unique.
    pub async fn expirations(&self, symbol: &str) -> Result<Vec<String>> {
        let session = self.connector.connect().await?;
        let listed = self.list_expirations(session.as_ref(), symbol).await;
        if let Err(e) = session.disconnect().await {
            warn!("Failed to close gateway session: {}", e);
        }
        listed
    }

    /// Fetch one gamma snapshot of `symbol` on `expiry` without storing it.
    pub async fn fetch(&self, symbol: &str, expiry: &str) -> Result<Vec<GammaObservation>> {
        self.fetch_on(symbol, expiry, time_utils::today()).await
    }

    /// Fetch one gamma snapshot and append it to the store.
    pub async fn fetch_and_store(&self, symbol: &str, expiry: &str) -> Result<Vec<GammaObservation>> {
        let rows = self.fetch(symbol, expiry).await?;
        let written = self.store.append_observations(&rows).await?;
        info!("{} {}: {} gamma observations stored", symbol, expiry, written);
        Ok(rows)
    }

    /// Symbols with stored gamma observations.
    pub fn symbols(&self) -> Result<Vec<String>> {
        self.store.symbols()
    }

    /// The most recent stored snapshot day of `symbol` on `expiry`.
    ///
    /// Every row observed on the latest observation date is returned.
    pub fn latest_snapshot(&self, symbol: &str, expiry: &str) -> Result<Vec<GammaObservation>> {
        let rows = self.store.load_observations(symbol, expiry)?;
        let latest = rows.iter().map(|r| r.date).max();
        Ok(rows
            .into_iter()
            .filter(|r| Some(r.date) == latest)
            .collect())
    }

    /// Fetch a snapshot stamped with `today`.
    pub async fn fetch_on(
        &self,
        symbol: &str,
        expiry: &str,
        today: NaiveDate,
    ) -> Result<Vec<GammaObservation>> {
        let session = self.connector.connect().await?;
        let fetched = self.fetch_rows(session.as_ref(), symbol, expiry, today).await;
        if let Err(e) = session.disconnect().await {
            warn!("Failed to close gateway session: {}", e);
        }
        fetched
    }

    async fn qualified_underlying(
        &self,
        session: &dyn MarketDataSession,
        symbol: &str,
    ) -> Result<Contract> {
        let contract = self.resolver.resolve(session, symbol, None).await?;
        Ok(session.qualify_contract(&contract).await?)
    }

    async fn list_expirations(&self, session: &dyn MarketDataSession, symbol: &str) -> Result<Vec<String>> {
        let underlying = self.qualified_underlying(session, symbol).await?;
        let chain_exchange = if underlying.sec_type == Some(SecType::Future) {
            FOP_EXCHANGE
        } else {
            ""
        };
        let chains = session
            .option_chain_params(&underlying, chain_exchange)
            .await?;
        let chain = chains
            .first()
            .ok_or_else(|| MarketDataError::NoExpirations(symbol.to_string()))?;

        Ok(chain.expiry_dates().into_iter().map(format_expiry).collect())
    }

    async fn fetch_rows(
        &self,
        session: &dyn MarketDataSession,
        symbol: &str,
        expiry: &str,
        today: NaiveDate,
    ) -> Result<Vec<GammaObservation>> {
        let underlying = self.qualified_underlying(session, symbol).await?;

        let spot = match sample_ticker(session, &underlying, true, self.settle, "spot price", |t| {
            t.last_or_close()
        })
        .await
        {
            Ok(spot) => spot,
            Err(MarketDataError::Timeout { .. }) => {
                return Err(MarketDataError::NoSpotPrice(symbol.to_string()).into())
            }
            Err(e) => return Err(e.into()),
        };

        let strikes = strike_ladder(spot, STRIKE_STEP, GEX_STRIKES_EACH_SIDE);
        info!(
            "{} {}: fetching gamma on {} strikes around {:.2}",
            symbol,
            expiry,
            strikes.len(),
            spot
        );

        let mut rows = Vec::new();
        for &strike in &strikes {
            for right in OptionRight::ALL {
                let mut query = Contract::option_query(
                    &underlying,
                    expiry,
                    strike,
                    right,
                    OPTION_ROUTING_EXCHANGE,
                );
                query.sec_type = Some(SecType::Option);

                match self.sample_gamma(session, &query).await {
                    Ok((gamma, open_interest)) => rows.push(GammaObservation {
                        date: today,
                        symbol: symbol.to_string(),
                        expiry: expiry.to_string(),
                        strike,
                        right,
                        open_interest: open_interest.unwrap_or(0.0),
                        gamma,
                        multiplier: GEX_CONTRACT_MULTIPLIER,
                        und_price: spot,
                    }),
                    Err(e) if e.failure_class() == FailureClass::Connection => return Err(e.into()),
                    Err(e) => debug!("{} {}: skipping {} {}: {}", symbol, expiry, right, strike, e),
                }
            }
        }

        Ok(rows)
    }

    /// Qualify one option and read its gamma and open interest from a snapshot.
    async fn sample_gamma(
        &self,
        session: &dyn MarketDataSession,
        query: &Contract,
    ) -> std::result::Result<(f64, Option<f64>), MarketDataError> {
        let option = session.qualify_contract(query).await?;
        sample_ticker(session, &option, true, self.settle, "option gamma", |t| {
            t.greeks_with_gamma()
                .and_then(|g| g.gamma)
                .map(|gamma| (gamma, t.open_interest.filter(|oi| oi.is_finite())))
        })
        .await
    }
}
