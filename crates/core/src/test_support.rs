//! In-memory gateway and stores shared by the service tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta};

use voldesk_market_data::{
    Bar, BarRequest, Contract, MarketDataError, MarketDataSession, ModelGreeks, OptionChainParams,
    OptionRight, SecType, SessionConnector, SettlePolicy, TickerId, TickerSnapshot,
};

use crate::bars::BarStore;
use crate::errors::{DatabaseError, Error, Result};
use crate::gex::{GammaObservation, GexStore};
use crate::greeks::{GreeksObservation, GreeksStore};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn fast_settle() -> SettlePolicy {
    SettlePolicy::new(Duration::from_millis(30), Duration::from_millis(5))
}

pub fn listed(symbol: &str, sec_type: SecType, exchange: &str, con_id: i64) -> Contract {
    let mut contract = Contract::query(symbol, sec_type, exchange, "USD");
    contract.con_id = Some(con_id);
    contract
}

/// Quote of one option as the fake gateway serves it.
#[derive(Clone, Debug, Default)]
pub struct OptionQuote {
    pub greeks: ModelGreeks,
    pub open_interest: Option<f64>,
}

/// What the fake gateway knows.
#[derive(Default)]
pub struct FakeMarket {
    /// Underlying listings answered by contract-details lookups
    pub listings: Vec<Contract>,
    /// Daily bars by symbol
    pub bars: HashMap<String, Vec<Bar>>,
    /// Bar requests ending on these dates fail with a gateway error
    pub failing_bar_ends: HashSet<NaiveDate>,
    /// Option chains by underlying symbol
    pub chains: HashMap<String, Vec<OptionChainParams>>,
    /// Last price of underlyings by symbol
    pub spots: HashMap<String, f64>,
    /// Option quotes by (symbol, expiry, strike, right)
    pub options: HashMap<(String, String, i64, OptionRight), OptionQuote>,
    pub refuse_connections: bool,
}

impl FakeMarket {
    pub fn add_option(
        &mut self,
        symbol: &str,
        expiry: &str,
        strike: f64,
        right: OptionRight,
        quote: OptionQuote,
    ) {
        self.options.insert(
            (symbol.to_string(), expiry.to_string(), strike as i64, right),
            quote,
        );
    }

    fn option_quote(&self, contract: &Contract) -> Option<&OptionQuote> {
        let key = (
            contract.symbol.clone(),
            contract.last_trade_date_or_contract_month.clone()?,
            contract.strike? as i64,
            contract.right?,
        );
        self.options.get(&key)
    }
}

/// Calls observed by the fake gateway.
#[derive(Default, Debug)]
pub struct CallLog {
    pub connects: usize,
    pub disconnects: usize,
    pub bar_requests: Vec<BarRequest>,
    pub details_queries: Vec<Contract>,
    pub subscriptions: Vec<Contract>,
    pub cancelled: Vec<TickerId>,
    pub chain_exchanges: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeGateway {
    pub market: Arc<Mutex<FakeMarket>>,
    pub log: Arc<Mutex<CallLog>>,
}

impl FakeGateway {
    pub fn new(market: FakeMarket) -> Self {
        Self {
            market: Arc::new(Mutex::new(market)),
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    pub fn connects(&self) -> usize {
        self.log.lock().unwrap().connects
    }

    pub fn disconnects(&self) -> usize {
        self.log.lock().unwrap().disconnects
    }
}

#[async_trait]
impl SessionConnector for FakeGateway {
    async fn connect(&self) -> std::result::Result<Box<dyn MarketDataSession>, MarketDataError> {
        if self.market.lock().unwrap().refuse_connections {
            return Err(MarketDataError::ConnectionFailed {
                host: "127.0.0.1".to_string(),
                port: 7497,
                message: "Connection refused".to_string(),
            });
        }
        self.log.lock().unwrap().connects += 1;
        Ok(Box::new(FakeSession {
            gateway: self.clone(),
            tickers: Mutex::new(Vec::new()),
        }))
    }
}

pub struct FakeSession {
    gateway: FakeGateway,
    tickers: Mutex<Vec<(Contract, bool)>>,
}

type GatewayResult<T> = std::result::Result<T, MarketDataError>;

fn parse_duration_days(duration: &str) -> i64 {
    duration
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl MarketDataSession for FakeSession {
    async fn disconnect(&self) -> GatewayResult<()> {
        self.gateway.log.lock().unwrap().disconnects += 1;
        Ok(())
    }

    async fn contract_details(&self, query: &Contract) -> GatewayResult<Vec<Contract>> {
        self.gateway
            .log
            .lock()
            .unwrap()
            .details_queries
            .push(query.clone());
        let market = self.gateway.market.lock().unwrap();

        if query.strike.is_some() {
            let mut qualified = query.clone();
            qualified.con_id = Some(1_000);
            return Ok(market
                .option_quote(query)
                .map(|_| vec![qualified])
                .unwrap_or_default());
        }

        Ok(market
            .listings
            .iter()
            .filter(|c| c.symbol == query.symbol && c.sec_type == query.sec_type)
            .cloned()
            .collect())
    }

    async fn qualify_contract(&self, contract: &Contract) -> GatewayResult<Contract> {
        let market = self.gateway.market.lock().unwrap();
        if contract.strike.is_some() && market.option_quote(contract).is_none() {
            return Err(MarketDataError::ContractNotFound(contract.to_string()));
        }
        let mut qualified = contract.clone();
        qualified.con_id.get_or_insert(1_000);
        Ok(qualified)
    }

    async fn historical_bars(&self, contract: &Contract, request: &BarRequest) -> GatewayResult<Vec<Bar>> {
        self.gateway
            .log
            .lock()
            .unwrap()
            .bar_requests
            .push(request.clone());
        let market = self.gateway.market.lock().unwrap();

        if market.failing_bar_ends.contains(&request.end.date()) {
            return Err(MarketDataError::GatewayError {
                message: "Historical data farm connection is broken".to_string(),
            });
        }

        let start = request.end - TimeDelta::days(parse_duration_days(&request.duration));
        Ok(market
            .bars
            .get(&contract.symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| {
                        let at = b.date.and_hms_opt(0, 0, 0).unwrap();
                        at >= start && at < request.end
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn request_market_data(&self, contract: &Contract, snapshot: bool) -> GatewayResult<TickerId> {
        self.gateway
            .log
            .lock()
            .unwrap()
            .subscriptions
            .push(contract.clone());
        let mut tickers = self.tickers.lock().unwrap();
        tickers.push((contract.clone(), snapshot));
        Ok(tickers.len() as TickerId)
    }

    async fn ticker(&self, ticker_id: TickerId) -> GatewayResult<TickerSnapshot> {
        let (contract, _) = self
            .tickers
            .lock()
            .unwrap()
            .get(ticker_id as usize - 1)
            .cloned()
            .ok_or_else(|| MarketDataError::GatewayError {
                message: format!("Unknown ticker {}", ticker_id),
            })?;
        let market = self.gateway.market.lock().unwrap();

        if contract.strike.is_some() {
            return Ok(market
                .option_quote(&contract)
                .map(|q| TickerSnapshot {
                    open_interest: q.open_interest,
                    model_greeks: Some(q.greeks.clone()),
                    ..Default::default()
                })
                .unwrap_or_default());
        }

        Ok(TickerSnapshot {
            last: market.spots.get(&contract.symbol).copied(),
            ..Default::default()
        })
    }

    async fn cancel_market_data(&self, ticker_id: TickerId) -> GatewayResult<()> {
        self.gateway.log.lock().unwrap().cancelled.push(ticker_id);
        Ok(())
    }

    async fn option_chain_params(
        &self,
        underlying: &Contract,
        fut_fop_exchange: &str,
    ) -> GatewayResult<Vec<OptionChainParams>> {
        self.gateway
            .log
            .lock()
            .unwrap()
            .chain_exchanges
            .push(fut_fop_exchange.to_string());
        Ok(self
            .gateway
            .market
            .lock()
            .unwrap()
            .chains
            .get(&underlying.symbol)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Stores
// =============================================================================

#[derive(Clone, Default)]
pub struct MemoryBarStore {
    pub series: Arc<Mutex<BTreeMap<String, BTreeMap<NaiveDate, Bar>>>>,
    pub fail_on_upsert: Arc<Mutex<bool>>,
}

impl MemoryBarStore {
    pub fn with_series(symbol: &str, bars: Vec<Bar>) -> Self {
        let store = Self::default();
        store.series.lock().unwrap().insert(
            symbol.to_string(),
            bars.into_iter().map(|b| (b.date, b)).collect(),
        );
        store
    }

    pub fn rows(&self, symbol: &str) -> usize {
        self.series
            .lock()
            .unwrap()
            .get(symbol)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl BarStore for MemoryBarStore {
    fn series_exists(&self, symbol: &str) -> Result<bool> {
        Ok(self.series.lock().unwrap().contains_key(symbol))
    }

    fn latest_date(&self, symbol: &str) -> Result<Option<NaiveDate>> {
        Ok(self
            .series
            .lock()
            .unwrap()
            .get(symbol)
            .and_then(|s| s.keys().next_back().copied()))
    }

    fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>> {
        Ok(self
            .series
            .lock()
            .unwrap()
            .get(symbol)
            .map(|s| s.values().cloned().collect())
            .unwrap_or_default())
    }

    fn list_series(&self) -> Result<Vec<String>> {
        Ok(self.series.lock().unwrap().keys().cloned().collect())
    }

    async fn ensure_series(&self, symbol: &str) -> Result<()> {
        self.series
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_default();
        Ok(())
    }

    async fn upsert_bars(&self, symbol: &str, bars: &[Bar]) -> Result<usize> {
        if *self.fail_on_upsert.lock().unwrap() {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        let mut series = self.series.lock().unwrap();
        let table = series.entry(symbol.to_string()).or_default();
        for bar in bars {
            table.insert(bar.date, bar.clone());
        }
        Ok(bars.len())
    }
}

#[derive(Clone, Default)]
pub struct MemoryGreeksStore {
    pub rows: Arc<Mutex<Vec<GreeksObservation>>>,
}

#[async_trait]
impl GreeksStore for MemoryGreeksStore {
    fn has_observations(&self, symbol: &str, date: NaiveDate) -> Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.symbol == symbol && r.date == date))
    }

    fn load_observations(&self, symbol: &str) -> Result<Vec<GreeksObservation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.symbol == symbol)
            .cloned()
            .collect())
    }

    async fn upsert_observations(&self, rows: &[GreeksObservation]) -> Result<usize> {
        let mut stored = self.rows.lock().unwrap();
        for row in rows {
            stored.retain(|r| {
                !(r.date == row.date
                    && r.symbol == row.symbol
                    && r.right == row.right
                    && r.strike == row.strike)
            });
            stored.push(row.clone());
        }
        Ok(rows.len())
    }
}

#[derive(Clone, Default)]
pub struct MemoryGexStore {
    pub rows: Arc<Mutex<Vec<GammaObservation>>>,
}

#[async_trait]
impl GexStore for MemoryGexStore {
    fn load_observations(&self, symbol: &str, expiry: &str) -> Result<Vec<GammaObservation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.symbol == symbol && r.expiry == expiry)
            .cloned()
            .collect())
    }

    fn symbols(&self) -> Result<Vec<String>> {
        let mut symbols: Vec<String> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    async fn append_observations(&self, rows: &[GammaObservation]) -> Result<usize> {
        self.rows.lock().unwrap().extend_from_slice(rows);
        Ok(rows.len())
    }
}
