//! Contract resolver - symbol to qualified gateway contract.

use log::{debug, info};

use crate::errors::MarketDataError;
use crate::models::{Contract, Instrument, SecType};
use crate::session::MarketDataSession;

use super::exchange_table::{classify, venue_for, SymbolClass};

/// Which listing to pick when a futures query without expiry returns several.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FuturesSelection {
    /// First contract in the order the gateway lists them
    #[default]
    FirstListed,
    /// Contract with the earliest last trade date
    NearestExpiry,
}

/// Resolves symbols and catalog instruments to qualified contracts.
///
/// Every path ends with a contract-details round-trip; a lookup returning
/// no details is a resolution failure listing the security types tried.
#[derive(Clone, Debug, Default)]
pub struct ContractResolver {
    futures_selection: FuturesSelection,
}

impl ContractResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_futures_selection(futures_selection: FuturesSelection) -> Self {
        Self { futures_selection }
    }

    pub fn futures_selection(&self) -> FuturesSelection {
        self.futures_selection
    }

    /// Resolve a normalised symbol through the static venue table.
    ///
    /// Known futures take `expiry` when given, otherwise the whole listing is
    /// requested. Known indices resolve as indices. Anything else is tried as
    /// a stock, then as an index.
    pub async fn resolve(
        &self,
        session: &dyn MarketDataSession,
        symbol: &str,
        expiry: Option<&str>,
    ) -> Result<Contract, MarketDataError> {
        let (exchange, currency) = venue_for(symbol);

        match classify(symbol) {
            SymbolClass::Future => {
                let mut query = Contract::query(symbol, SecType::Future, exchange, currency);
                query.last_trade_date_or_contract_month = expiry.map(str::to_string);
                self.resolve_future(session, &query).await
            }
            SymbolClass::Index => {
                let query = Contract::query(symbol, SecType::Index, exchange, currency);
                self.first_detail(session, &query)
                    .await?
                    .ok_or_else(|| resolution_failed(symbol, vec![SecType::Index]))
            }
            SymbolClass::Unknown => {
                let mut attempted = Vec::with_capacity(2);
                for sec_type in [SecType::Stock, SecType::Index] {
                    attempted.push(sec_type);
                    let query = Contract::query(symbol, sec_type, exchange, currency);
                    match self.first_detail(session, &query).await {
                        Ok(Some(contract)) => return Ok(contract),
                        Ok(None) => debug!("{} has no {} listing", symbol, sec_type),
                        Err(e) => debug!("{} lookup as {} failed: {}", symbol, sec_type, e),
                    }
                }
                Err(resolution_failed(symbol, attempted))
            }
        }
    }

    /// Resolve a catalog instrument with its own exchange, currency and type.
    pub async fn resolve_instrument(
        &self,
        session: &dyn MarketDataSession,
        instrument: &Instrument,
    ) -> Result<Contract, MarketDataError> {
        let query = Contract::from_instrument(instrument);

        if instrument.sec_type == SecType::Future {
            return self.resolve_future(session, &query).await;
        }

        self.first_detail(session, &query)
            .await?
            .ok_or_else(|| resolution_failed(&instrument.symbol, vec![instrument.sec_type]))
    }

    async fn resolve_future(
        &self,
        session: &dyn MarketDataSession,
        query: &Contract,
    ) -> Result<Contract, MarketDataError> {
        let listings = session.contract_details(query).await?;
        let selected = match self.futures_selection {
            FuturesSelection::FirstListed => listings.into_iter().next(),
            FuturesSelection::NearestExpiry => listings
                .into_iter()
                .filter(|c| c.last_trade_date_or_contract_month.is_some())
                .min_by(|a, b| {
                    a.last_trade_date_or_contract_month
                        .cmp(&b.last_trade_date_or_contract_month)
                }),
        };

        match selected {
            Some(contract) => {
                info!("Selected future {}", contract);
                Ok(contract)
            }
            None => Err(resolution_failed(&query.symbol, vec![SecType::Future])),
        }
    }

    async fn first_detail(
        &self,
        session: &dyn MarketDataSession,
        query: &Contract,
    ) -> Result<Option<Contract>, MarketDataError> {
        Ok(session.contract_details(query).await?.into_iter().next())
    }
}

fn resolution_failed(symbol: &str, attempted: Vec<SecType>) -> MarketDataError {
    MarketDataError::ResolutionFailed {
        symbol: symbol.to_string(),
        attempted,
    }
}
