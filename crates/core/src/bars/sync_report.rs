//! Outcome of a history import run.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Status of one instrument after an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// At least one bar was written.
    Success,
    /// The series was already up to date; nothing was requested.
    Skipped,
    /// Every chunk came back empty or failed; no series was created.
    NoData,
    /// The instrument could not be resolved or its series read.
    Failed,
}

/// A chunk whose fetch or insert failed. The import continued past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkFailure {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub message: String,
}

/// Result of importing one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSyncResult {
    pub symbol: String,
    pub status: SyncStatus,
    /// Number of bars inserted or replaced
    pub rows_written: usize,
    pub chunk_failures: Vec<ChunkFailure>,
    /// Why the instrument failed, when it did
    pub error: Option<String>,
}

impl InstrumentSyncResult {
    pub fn failed(symbol: &str, error: impl ToString) -> Self {
        Self {
            symbol: symbol.to_string(),
            status: SyncStatus::Failed,
            rows_written: 0,
            chunk_failures: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn skipped(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            status: SyncStatus::Skipped,
            rows_written: 0,
            chunk_failures: Vec::new(),
            error: None,
        }
    }
}

/// Summary of an import run across instruments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Instruments with rows written
    pub synced: usize,
    pub skipped: usize,
    pub no_data: usize,
    pub failed: usize,
    /// Total bars written
    pub rows_written: usize,
    pub results: Vec<InstrumentSyncResult>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: InstrumentSyncResult) {
        match result.status {
            SyncStatus::Success => {
                self.synced += 1;
                self.rows_written += result.rows_written;
            }
            SyncStatus::Skipped => self.skipped += 1,
            SyncStatus::NoData => self.no_data += 1,
            SyncStatus::Failed => self.failed += 1,
        }
        self.results.push(result);
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentSyncResult> {
        self.results.iter().find(|r| r.symbol == symbol)
    }
}
