//! Request and response payloads of the gateway bridge.

use serde::{Deserialize, Serialize};

use crate::models::{Bar, BarRequest, Contract, OptionChainParams, TickerId};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OpenSessionRequest {
    pub client_id: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OpenSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContractsResponse {
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryRequest<'a> {
    pub contract: &'a Contract,
    #[serde(flatten)]
    pub request: &'a BarRequest,
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryResponse {
    #[serde(default)]
    pub bars: Vec<Bar>,
}

#[derive(Debug, Serialize)]
pub(super) struct MarketDataRequest<'a> {
    pub contract: &'a Contract,
    pub snapshot: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MarketDataResponse {
    pub ticker_id: TickerId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OptionParamsRequest<'a> {
    pub underlying: &'a Contract,
    pub fut_fop_exchange: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct OptionParamsResponse {
    #[serde(default)]
    pub chains: Vec<OptionChainParams>,
}
