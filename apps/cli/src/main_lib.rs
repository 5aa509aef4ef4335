use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voldesk_core::bars::{BarStore, HistoryImporter};
use voldesk_core::gex::{GexService, GexStore};
use voldesk_core::greeks::{GreeksSampler, GreeksStore};
use voldesk_core::InstrumentCatalog;
use voldesk_market_data::{HttpGateway, SessionConnector};
use voldesk_storage_sqlite::{Database, SqliteBarStore, SqliteGexStore, SqliteGreeksStore};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr; stdout carries the JSON output
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Everything a command needs: stores, gateway connector and the catalog.
pub struct AppState {
    pub config: Config,
    pub offline: bool,
    pub catalog: InstrumentCatalog,
    pub connector: Arc<dyn SessionConnector>,
    pub bar_store: Arc<dyn BarStore>,
    pub greeks_store: Arc<dyn GreeksStore>,
    pub gex_store: Arc<dyn GexStore>,
}

impl AppState {
    pub fn importer(&self) -> HistoryImporter {
        HistoryImporter::new(self.connector.clone(), self.bar_store.clone())
    }

    pub fn sampler(&self) -> GreeksSampler {
        GreeksSampler::new(self.connector.clone(), self.greeks_store.clone())
            .with_settle_policy(self.config.settle_policy())
    }

    pub fn gex(&self) -> GexService {
        GexService::new(self.connector.clone(), self.gex_store.clone())
            .with_settle_policy(self.config.settle_policy())
    }
}

pub fn build_state(config: Config, offline: bool) -> anyhow::Result<AppState> {
    let db = Database::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db.path().display());

    let gateway = HttpGateway::new(config.gateway());
    tracing::debug!(
        "Gateway bridge at {}:{} (client id {})",
        config.gateway_host,
        config.gateway_port,
        config.client_id
    );

    Ok(AppState {
        offline,
        catalog: InstrumentCatalog::seeded(),
        connector: Arc::new(gateway),
        bar_store: Arc::new(SqliteBarStore::new(db.clone())),
        greeks_store: Arc::new(SqliteGreeksStore::new(db.clone())),
        gex_store: Arc::new(SqliteGexStore::new(db)),
        config,
    })
}
