//! HTTP binding of the gateway session.
//!
//! Talks JSON to a gateway bridge process running next to the broker's
//! trading terminal. The bridge relays each call to the terminal; nothing
//! of the terminal's own protocol is implemented here.
//!
//! # Endpoints
//!
//! - Open session: `POST /v1/sessions` `{ clientId }` -> `{ sessionId }`
//! - Close session: `DELETE /v1/sessions/{sessionId}`
//! - Contract details: `POST /v1/contracts/details` -> `{ contracts }`
//! - Qualification: `POST /v1/contracts/qualify` -> `{ contracts }`
//! - Historical bars: `POST /v1/history` -> `{ bars }`
//! - Live quotes: `POST /v1/market-data` -> `{ tickerId }`,
//!   `GET|DELETE /v1/market-data/{tickerId}`
//! - Option chains: `POST /v1/options/params` -> `{ chains }`
//!
//! Every call after the first carries the `X-Session-Id` header.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::errors::MarketDataError;
use crate::models::{Bar, BarRequest, Contract, OptionChainParams, TickerId, TickerSnapshot};

use super::traits::{MarketDataSession, SessionConnector};
use models::*;

const SESSION_HEADER: &str = "X-Session-Id";

/// Where the gateway bridge listens and how to identify to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Client id presented to the terminal; must be unique among live sessions
    pub client_id: u32,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7497,
            client_id: 99,
            timeout: Duration::from_secs(5),
        }
    }
}

impl GatewayConfig {
    fn base_url(&self) -> String {
        format!("http://{}:{}/v1", self.host, self.port)
    }
}

/// Opens [`HttpSession`]s against the gateway bridge.
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn connection_error(&self, e: impl std::fmt::Display) -> MarketDataError {
        MarketDataError::ConnectionFailed {
            host: self.config.host.clone(),
            port: self.config.port,
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl SessionConnector for HttpGateway {
    async fn connect(&self) -> Result<Box<dyn MarketDataSession>, MarketDataError> {
        let base_url = self.config.base_url();
        let response = self
            .client
            .post(format!("{}/sessions", base_url))
            .json(&OpenSessionRequest {
                client_id: self.config.client_id,
            })
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        if !response.status().is_success() {
            return Err(self.connection_error(format!("HTTP {}", response.status())));
        }

        let opened: OpenSessionResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::InvalidResponse {
                message: e.to_string(),
            })?;

        debug!(
            "Gateway session {} opened with client id {}",
            opened.session_id, self.config.client_id
        );

        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            base_url,
            session_id: opened.session_id,
        }))
    }
}

/// A session opened through [`HttpGateway`].
pub struct HttpSession {
    client: Client,
    base_url: String,
    session_id: String,
}

impl HttpSession {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode its JSON body.
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, MarketDataError> {
        let response = request
            .header(SESSION_HEADER, &self.session_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::GatewayError {
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MarketDataError::InvalidResponse {
                message: e.to_string(),
            })
    }

    /// Send a request whose response carries no body of interest.
    async fn call_empty(&self, request: RequestBuilder) -> Result<(), MarketDataError> {
        let response = request
            .header(SESSION_HEADER, &self.session_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::GatewayError {
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataSession for HttpSession {
    async fn disconnect(&self) -> Result<(), MarketDataError> {
        let url = self.url(&format!("/sessions/{}", self.session_id));
        self.call_empty(self.client.delete(url)).await?;
        debug!("Gateway session {} closed", self.session_id);
        Ok(())
    }

    async fn contract_details(&self, query: &Contract) -> Result<Vec<Contract>, MarketDataError> {
        let request = self.client.post(self.url("/contracts/details")).json(query);
        let response: ContractsResponse = self.call(request).await?;
        Ok(response.contracts)
    }

    async fn qualify_contract(&self, contract: &Contract) -> Result<Contract, MarketDataError> {
        let request = self.client.post(self.url("/contracts/qualify")).json(contract);
        let response: ContractsResponse = self.call(request).await?;

        if response.contracts.len() > 1 {
            warn!(
                "Ambiguous qualification for {}: {} matches, using the first",
                contract,
                response.contracts.len()
            );
        }
        response
            .contracts
            .into_iter()
            .next()
            .filter(Contract::is_qualified)
            .ok_or_else(|| MarketDataError::ContractNotFound(contract.to_string()))
    }

    async fn historical_bars(
        &self,
        contract: &Contract,
        request: &BarRequest,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let body = HistoryRequest { contract, request };
        let http_request = self.client.post(self.url("/history")).json(&body);
        let response: HistoryResponse = self.call(http_request).await?;

        let mut bars = response.bars;
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    async fn request_market_data(
        &self,
        contract: &Contract,
        snapshot: bool,
    ) -> Result<TickerId, MarketDataError> {
        let body = MarketDataRequest { contract, snapshot };
        let request = self.client.post(self.url("/market-data")).json(&body);
        let response: MarketDataResponse = self.call(request).await?;
        Ok(response.ticker_id)
    }

    async fn ticker(&self, ticker_id: TickerId) -> Result<TickerSnapshot, MarketDataError> {
        let request = self
            .client
            .get(self.url(&format!("/market-data/{}", ticker_id)));
        self.call(request).await
    }

    async fn cancel_market_data(&self, ticker_id: TickerId) -> Result<(), MarketDataError> {
        let request = self
            .client
            .delete(self.url(&format!("/market-data/{}", ticker_id)));
        self.call_empty(request).await
    }

    async fn option_chain_params(
        &self,
        underlying: &Contract,
        fut_fop_exchange: &str,
    ) -> Result<Vec<OptionChainParams>, MarketDataError> {
        let body = OptionParamsRequest {
            underlying,
            fut_fop_exchange,
        };
        let request = self.client.post(self.url("/options/params")).json(&body);
        let response: OptionParamsResponse = self.call(request).await?;
        Ok(response.chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let config = GatewayConfig {
            host: "localhost".to_string(),
            port: 4002,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:4002/v1");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_connection_failure() {
        // Port 9 (discard) is not expected to run a gateway bridge.
        let gateway = HttpGateway::new(GatewayConfig {
            host: "127.0.0.1".to_string(),
            port: 9,
            client_id: 100,
            timeout: Duration::from_millis(500),
        });
        let err = match gateway.connect().await {
            Ok(_) => panic!("connected to a closed port"),
            Err(e) => e,
        };
        assert!(matches!(err, MarketDataError::ConnectionFailed { port: 9, .. }));
        assert!(!gateway.check_connection().await);
    }
}
