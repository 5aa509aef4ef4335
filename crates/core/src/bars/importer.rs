//! Incremental history importer.
//!
//! # Architecture
//!
//! ```text
//! HistoryImporter
//!       │
//!       ├─► SessionConnector (one gateway session per run)
//!       ├─► ContractResolver (instrument -> qualified contract)
//!       └─► BarStore (resume point, lazy series creation, upserts)
//! ```
//!
//! For each instrument the importer resumes from the day after the latest
//! stored bar (or the epoch), requests the missing range in windows of at
//! most a year and upserts what comes back. A failing window is recorded
//! and skipped; a failing instrument does not stop the others.

use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime};
use log::{debug, error, info, warn};

use voldesk_market_data::{
    Bar, BarRequest, Contract, ContractResolver, Instrument, MarketDataSession, SessionConnector,
};

use super::bars_traits::BarStore;
use super::chunking::{date_chunks, resume_point};
use super::sync_report::{ChunkFailure, InstrumentSyncResult, SyncReport, SyncStatus};
use crate::errors::Result;
use crate::utils::time_utils;

pub struct HistoryImporter {
    connector: Arc<dyn SessionConnector>,
    store: Arc<dyn BarStore>,
    resolver: ContractResolver,
}

impl HistoryImporter {
    pub fn new(connector: Arc<dyn SessionConnector>, store: Arc<dyn BarStore>) -> Self {
        Self {
            connector,
            store,
            resolver: ContractResolver::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: ContractResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Import every missing bar up to now.
    ///
    /// Fails only when the gateway session cannot be opened; per-instrument
    /// failures are reported in the returned [`SyncReport`].
    pub async fn sync(&self, instruments: &[Instrument]) -> Result<SyncReport> {
        self.sync_until(instruments, time_utils::now()).await
    }

    /// Import every missing bar up to `end` (exclusive).
    pub async fn sync_until(&self, instruments: &[Instrument], end: NaiveDateTime) -> Result<SyncReport> {
        let session = self.connector.connect().await?;

        let mut report = SyncReport::new();
        for instrument in instruments {
            let result = self.sync_instrument(session.as_ref(), instrument, end).await;
            report.add_result(result);
        }

        if let Err(e) = session.disconnect().await {
            warn!("Failed to close gateway session: {}", e);
        }

        info!(
            "History import finished: {} synced, {} up to date, {} without data, {} failed, {} rows",
            report.synced, report.skipped, report.no_data, report.failed, report.rows_written
        );
        Ok(report)
    }

    async fn sync_instrument(
        &self,
        session: &dyn MarketDataSession,
        instrument: &Instrument,
        end: NaiveDateTime,
    ) -> InstrumentSyncResult {
        let symbol = instrument.symbol.as_str();

        let contract = match self.resolver.resolve_instrument(session, instrument).await {
            Ok(contract) => contract,
            Err(e) => {
                error!("{}: {}", symbol, e);
                return InstrumentSyncResult::failed(symbol, e);
            }
        };

        let latest = match self.store.latest_date(symbol) {
            Ok(latest) => latest,
            Err(e) => {
                error!("{}: unable to read stored series: {}", symbol, e);
                return InstrumentSyncResult::failed(symbol, e);
            }
        };

        let start = resume_point(latest).and_time(NaiveTime::MIN);
        let chunks = date_chunks(start, end);
        if chunks.is_empty() {
            info!("{}: already up to date", symbol);
            return InstrumentSyncResult::skipped(symbol);
        }
        debug!(
            "{}: importing from {} in {} request(s)",
            symbol,
            start.date(),
            chunks.len()
        );

        let mut rows_written = 0;
        let mut chunk_failures = Vec::new();

        for (chunk_start, chunk_end) in chunks {
            match self
                .import_chunk(session, &contract, symbol, chunk_start, chunk_end)
                .await
            {
                Ok(0) => warn!(
                    "{}: no data between {} and {}",
                    symbol,
                    chunk_start.date(),
                    chunk_end.date()
                ),
                Ok(rows) => {
                    rows_written += rows;
                    info!(
                        "{}: {} -> {}: {} rows",
                        symbol,
                        chunk_start.date(),
                        chunk_end.date(),
                        rows
                    );
                }
                Err(e) => {
                    error!(
                        "{}: error between {} and {}: {}",
                        symbol,
                        chunk_start.date(),
                        chunk_end.date(),
                        e
                    );
                    chunk_failures.push(ChunkFailure {
                        start: chunk_start,
                        end: chunk_end,
                        message: e.to_string(),
                    });
                }
            }
        }

        let status = if rows_written == 0 {
            error!("{}: no historical data retrieved, series not created", symbol);
            SyncStatus::NoData
        } else {
            info!("{}: {} rows written", symbol, rows_written);
            SyncStatus::Success
        };

        InstrumentSyncResult {
            symbol: symbol.to_string(),
            status,
            rows_written,
            chunk_failures,
            error: None,
        }
    }

    /// Fetch and store one window. Returns the number of bars written.
    async fn import_chunk(
        &self,
        session: &dyn MarketDataSession,
        contract: &Contract,
        symbol: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<usize> {
        let request = BarRequest::daily(start, end);
        let bars: Vec<Bar> = session
            .historical_bars(contract, &request)
            .await?
            .into_iter()
            .filter(|b| {
                let at = b.date.and_time(NaiveTime::MIN);
                at >= start && at < end
            })
            .collect();

        if bars.is_empty() {
            return Ok(0);
        }

        // Creates the series on the first non-empty window
        self.store.upsert_bars(symbol, &bars).await
    }
}
