//! Daily bar series and the incremental history importer.

mod bars_traits;
mod chunking;
mod importer;
mod sync_report;

pub use bars_traits::BarStore;
pub use chunking::{date_chunks, history_epoch, resume_point};
pub use importer::HistoryImporter;
pub use sync_report::{ChunkFailure, InstrumentSyncResult, SyncReport, SyncStatus};
