//! Subcommands and their handlers. Every handler returns the JSON it prints.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use voldesk_core::analytics::{
    fit_har_rv, gamma_exposure, historical_volatility, realized_volatility, return_distribution,
    weekday_heatmap, Period, ReturnMeasure, ReturnMode, WEEKDAY_LABELS,
};
use voldesk_core::constants::DATE_FORMAT;
use voldesk_core::greeks::{ExpirySelection, RefreshOptions};
use voldesk_core::utils::time_utils;
use voldesk_core::InstrumentCatalog;
use voldesk_market_data::resolver::{classify, venue_for, SymbolClass};
use voldesk_market_data::{normalize_symbol, Bar, Instrument, SecType};

use crate::main_lib::AppState;

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether the gateway accepts connections.
    Status,
    /// List the instrument catalog.
    Catalog,
    /// List stored daily series with their latest date.
    Series,
    /// Import daily bars up to now. Defaults to the whole catalog.
    Sync(SyncArgs),
    /// Print stored daily bars.
    Bars {
        symbol: String,
        #[arg(long, default_value = "full")]
        period: String,
    },
    /// Sample option Greeks around the money and store them.
    Greeks {
        symbol: String,
        /// Sample again even when today's observations exist.
        #[arg(long, default_value_t = false)]
        force: bool,
        /// Expiry (YYYY-MM-DD). Defaults to the nearest listed expiry.
        #[arg(long)]
        expiry: Option<String>,
    },
    /// List option expirations of a symbol.
    Expirations { symbol: String },
    /// Gamma exposure snapshots.
    Gex {
        #[command(subcommand)]
        action: GexAction,
    },
    /// Derived volatility analytics over stored data.
    Analyze {
        #[command(subcommand)]
        view: AnalyzeView,
    },
}

#[derive(Args)]
pub struct SyncArgs {
    /// Symbols to import. Unknown symbols are added to the catalog.
    pub symbols: Vec<String>,
    /// Security type of added symbols (STK, IND, FUT).
    #[arg(long)]
    pub sec_type: Option<String>,
    #[arg(long)]
    pub exchange: Option<String>,
    #[arg(long)]
    pub currency: Option<String>,
    /// Contract month of added futures (YYYYMM or YYYYMMDD).
    #[arg(long)]
    pub contract_month: Option<String>,
}

#[derive(Subcommand)]
pub enum GexAction {
    /// Fetch a gamma snapshot and append it to the store.
    Fetch { symbol: String, expiry: String },
    /// Exposure per strike of the latest stored snapshot.
    Show { symbol: String, expiry: String },
    /// Symbols with stored gamma snapshots.
    Symbols,
}

#[derive(Args)]
pub struct AnalysisArgs {
    pub symbol: String,
    /// 1y, 5y or full.
    #[arg(long, default_value = "full")]
    pub period: String,
    /// C2C or O2C.
    #[arg(long, default_value = "C2C")]
    pub mode: String,
}

#[derive(Subcommand)]
pub enum AnalyzeView {
    /// Realized volatility with rolling means.
    Vol {
        #[command(flatten)]
        args: AnalysisArgs,
        /// squared, absolute or signed.
        #[arg(long, default_value = "squared")]
        measure: String,
    },
    /// HAR-RV fit and next-day forecast.
    Har {
        #[command(flatten)]
        args: AnalysisArgs,
    },
    /// Return distribution per year.
    Dist {
        #[command(flatten)]
        args: AnalysisArgs,
        #[arg(long, default_value_t = false)]
        signed: bool,
    },
    /// Mean return per year and weekday.
    Weekday {
        #[command(flatten)]
        args: AnalysisArgs,
        #[arg(long, default_value_t = false)]
        signed: bool,
    },
    /// Historical volatility with the ATM implied vol overlay.
    Hv {
        symbol: String,
        #[arg(long, default_value = "full")]
        period: String,
    },
}

pub async fn run(command: Commands, state: &mut AppState) -> Result<Value> {
    match command {
        Commands::Status => status(state).await,
        Commands::Catalog => Ok(serde_json::to_value(state.catalog.iter().collect::<Vec<_>>())?),
        Commands::Series => series(state),
        Commands::Sync(args) => sync(state, args).await,
        Commands::Bars { symbol, period } => {
            let symbol = normalize_symbol(&symbol);
            let bars = load_period(state, &symbol, &period)?;
            Ok(serde_json::to_value(bars)?)
        }
        Commands::Greeks {
            symbol,
            force,
            expiry,
        } => greeks(state, &symbol, force, expiry).await,
        Commands::Expirations { symbol } => {
            ensure_online(state)?;
            let expirations = state.gex().expirations(&normalize_symbol(&symbol)).await?;
            Ok(json!(expirations))
        }
        Commands::Gex { action } => gex(state, action).await,
        Commands::Analyze { view } => analyze(state, view),
    }
}

fn ensure_online(state: &AppState) -> Result<()> {
    if state.offline {
        bail!("offline mode: this command needs the gateway");
    }
    Ok(())
}

async fn status(state: &AppState) -> Result<Value> {
    let online = !state.offline && state.connector.check_connection().await;
    if !online && !state.offline {
        tracing::warn!(
            "Gateway at {}:{} is not reachable",
            state.config.gateway_host,
            state.config.gateway_port
        );
    }
    Ok(json!({
        "online": online,
        "offline": state.offline,
        "gateway": format!("{}:{}", state.config.gateway_host, state.config.gateway_port),
        "clientId": state.config.client_id,
        "dbPath": state.config.db_path,
    }))
}

fn series(state: &AppState) -> Result<Value> {
    let rows = state
        .bar_store
        .list_series()?
        .into_iter()
        .map(|symbol| {
            let latest = state.bar_store.latest_date(&symbol)?;
            Ok(json!({ "symbol": symbol, "latestDate": latest }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Array(rows))
}

/// Catalog instruments for `symbols`, registering the ones not yet listed.
pub fn instruments_for(
    catalog: InstrumentCatalog,
    args: &SyncArgs,
) -> Result<(InstrumentCatalog, Vec<Instrument>)> {
    if args.symbols.is_empty() {
        let all = catalog.iter().cloned().collect();
        return Ok((catalog, all));
    }

    let mut catalog = catalog;
    let mut instruments = Vec::with_capacity(args.symbols.len());
    for raw in &args.symbols {
        let symbol = normalize_symbol(raw);
        if !catalog.contains(&symbol) {
            catalog = catalog.register(manual_instrument(&symbol, args)?)?;
        }
        let instrument = catalog
            .get(&symbol)
            .cloned()
            .with_context(|| format!("{} missing from the catalog", symbol))?;
        instruments.push(instrument);
    }
    Ok((catalog, instruments))
}

fn manual_instrument(symbol: &str, args: &SyncArgs) -> Result<Instrument> {
    let sec_type = match &args.sec_type {
        Some(code) => code.parse::<SecType>().map_err(anyhow::Error::msg)?,
        None => match classify(symbol) {
            SymbolClass::Future => SecType::Future,
            SymbolClass::Index => SecType::Index,
            SymbolClass::Unknown => SecType::Stock,
        },
    };
    let (exchange, currency) = venue_for(symbol);
    let exchange = args.exchange.clone().unwrap_or_else(|| exchange.to_string());
    let currency = args.currency.clone().unwrap_or_else(|| currency.to_string());

    let mut instrument = Instrument::new(symbol, sec_type, exchange, currency);
    if let Some(month) = &args.contract_month {
        instrument = instrument.with_contract_month(month.clone());
    }
    Ok(instrument)
}

async fn sync(state: &mut AppState, args: SyncArgs) -> Result<Value> {
    ensure_online(state)?;
    let (catalog, instruments) = instruments_for(state.catalog.clone(), &args)?;
    state.catalog = catalog;

    let report = state.importer().sync(&instruments).await?;
    tracing::info!(
        "Sync finished: {} synced, {} skipped, {} without data, {} failed",
        report.synced,
        report.skipped,
        report.no_data,
        report.failed
    );
    Ok(serde_json::to_value(report)?)
}

async fn greeks(
    state: &AppState,
    symbol: &str,
    force: bool,
    expiry: Option<String>,
) -> Result<Value> {
    ensure_online(state)?;
    let expiry = match expiry {
        Some(raw) => ExpirySelection::Fixed(parse_date(&raw)?),
        None => ExpirySelection::Nearest,
    };
    let symbol = normalize_symbol(symbol);
    let reading = state
        .sampler()
        .refresh(&symbol, RefreshOptions { force, expiry })
        .await?;

    match reading {
        Some(reading) => Ok(serde_json::to_value(reading)?),
        None => {
            tracing::info!("{}: Greeks already sampled today", symbol);
            Ok(json!({ "symbol": symbol, "skipped": true }))
        }
    }
}

async fn gex(state: &AppState, action: GexAction) -> Result<Value> {
    let service = state.gex();
    match action {
        GexAction::Fetch { symbol, expiry } => {
            ensure_online(state)?;
            let rows = service
                .fetch_and_store(&normalize_symbol(&symbol), &expiry)
                .await?;
            Ok(serde_json::to_value(rows)?)
        }
        GexAction::Show { symbol, expiry } => {
            let rows = service.latest_snapshot(&normalize_symbol(&symbol), &expiry)?;
            if rows.is_empty() {
                bail!("no gamma snapshot stored for {} {}", symbol, expiry);
            }
            Ok(json!({
                "date": rows[0].date,
                "exposure": gamma_exposure(&rows),
            }))
        }
        GexAction::Symbols => Ok(json!(service.symbols()?)),
    }
}

fn analyze(state: &AppState, view: AnalyzeView) -> Result<Value> {
    match view {
        AnalyzeView::Vol { args, measure } => {
            let bars = load_period(state, &args.symbol, &args.period)?;
            let mode: ReturnMode = args.mode.parse()?;
            let measure: ReturnMeasure = measure.parse()?;
            Ok(serde_json::to_value(realized_volatility(&bars, mode, measure))?)
        }
        AnalyzeView::Har { args } => {
            let bars = load_period(state, &args.symbol, &args.period)?;
            let fit = fit_har_rv(&bars, args.mode.parse()?)?;
            Ok(serde_json::to_value(fit)?)
        }
        AnalyzeView::Dist { args, signed } => {
            let bars = load_period(state, &args.symbol, &args.period)?;
            let distribution = return_distribution(&bars, args.mode.parse()?, signed);
            Ok(serde_json::to_value(distribution)?)
        }
        AnalyzeView::Weekday { args, signed } => {
            let bars = load_period(state, &args.symbol, &args.period)?;
            let rows = weekday_heatmap(&bars, args.mode.parse()?, signed);
            Ok(json!({ "labels": WEEKDAY_LABELS, "rows": rows }))
        }
        AnalyzeView::Hv { symbol, period } => {
            let symbol = normalize_symbol(&symbol);
            let bars = load_period(state, &symbol, &period)?;
            let observations = state.greeks_store.load_observations(&symbol)?;
            let hv = historical_volatility(&bars, &observations, time_utils::today());
            Ok(serde_json::to_value(hv)?)
        }
    }
}

fn load_period(state: &AppState, symbol: &str, period: &str) -> Result<Vec<Bar>> {
    let symbol = normalize_symbol(symbol);
    let period: Period = period.parse()?;
    if !state.bar_store.series_exists(&symbol)? {
        bail!("no stored series for {}; run sync first", symbol);
    }
    let bars = state.bar_store.load_bars(&symbol)?;
    Ok(period.filter_bars(&bars, time_utils::today()))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::main_lib::build_state;
    use tempfile::TempDir;

    fn offline_state() -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market_data.db");
        let config = Config::from_lookup(|key| match key {
            "VD_DB_PATH" => Some(path.to_string_lossy().to_string()),
            _ => None,
        });
        let state = build_state(config, true).unwrap();
        (dir, state)
    }

    fn sync_args(symbols: &[&str]) -> SyncArgs {
        SyncArgs {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            sec_type: None,
            exchange: None,
            currency: None,
            contract_month: None,
        }
    }

    async fn seed_bars(state: &AppState, symbol: &str, sessions: usize) {
        let mut date = time_utils::today() - chrono::Duration::days(sessions as i64 * 2);
        let mut bars = Vec::new();
        let mut close = 100.0;
        for i in 0..sessions {
            date = time_utils::next_business_day(date);
            close *= if i % 3 == 0 { 1.012 } else { 0.995 };
            bars.push(Bar::new(date, close, close * 1.01, close * 0.99, close));
        }
        state.bar_store.ensure_series(symbol).await.unwrap();
        state.bar_store.upsert_bars(symbol, &bars).await.unwrap();
    }

    #[test]
    fn test_instruments_for_whole_catalog() {
        let catalog = InstrumentCatalog::seeded();
        let size = catalog.len();
        let (catalog, instruments) = instruments_for(catalog, &sync_args(&[])).unwrap();
        assert_eq!(instruments.len(), size);
        assert_eq!(catalog.len(), size);
    }

    #[test]
    fn test_instruments_for_registers_unknown_symbols() {
        let catalog = InstrumentCatalog::seeded();
        let size = catalog.len();
        let (catalog, instruments) =
            instruments_for(catalog, &sync_args(&["spx", "zzzq.pa"])).unwrap();

        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments[0].symbol, "SPX");
        assert_eq!(instruments[1].symbol, "ZZZQ");
        assert_eq!(instruments[1].sec_type, SecType::Stock);
        assert_eq!(instruments[1].exchange, "SMART");
        assert_eq!(catalog.len(), size + 1);
    }

    #[test]
    fn test_manual_instrument_overrides() {
        let mut args = sync_args(&["MES"]);
        args.sec_type = Some("FUT".to_string());
        args.exchange = Some("cme".to_string());
        args.contract_month = Some("202506".to_string());

        let (_, instruments) = instruments_for(InstrumentCatalog::empty(), &args).unwrap();
        assert_eq!(instruments[0].sec_type, SecType::Future);
        assert_eq!(instruments[0].exchange, "CME");
        assert_eq!(instruments[0].contract_month.as_deref(), Some("202506"));
    }

    #[tokio::test]
    async fn test_gateway_commands_refused_offline() {
        let (_dir, mut state) = offline_state();
        let err = run(Commands::Sync(sync_args(&["SPX"])), &mut state)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("offline"));

        let status = run(Commands::Status, &mut state).await.unwrap();
        assert_eq!(status["online"], json!(false));
        assert_eq!(status["offline"], json!(true));
    }

    #[tokio::test]
    async fn test_series_and_bars_from_store() {
        let (_dir, mut state) = offline_state();
        seed_bars(&state, "SPX", 10).await;

        let series = run(Commands::Series, &mut state).await.unwrap();
        assert_eq!(series[0]["symbol"], json!("SPX"));

        let bars = run(
            Commands::Bars {
                symbol: "spx".to_string(),
                period: "1y".to_string(),
            },
            &mut state,
        )
        .await
        .unwrap();
        assert_eq!(bars.as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_analysis_of_missing_series_fails() {
        let (_dir, mut state) = offline_state();
        let view = AnalyzeView::Har {
            args: AnalysisArgs {
                symbol: "NDX".to_string(),
                period: "full".to_string(),
                mode: "C2C".to_string(),
            },
        };
        let err = run(Commands::Analyze { view }, &mut state).await.unwrap_err();
        assert!(err.to_string().contains("no stored series"));
    }

    #[tokio::test]
    async fn test_distribution_counts_every_return() {
        let (_dir, mut state) = offline_state();
        seed_bars(&state, "SPX", 40).await;
        let view = AnalyzeView::Dist {
            args: AnalysisArgs {
                symbol: "SPX".to_string(),
                period: "full".to_string(),
                mode: "C2C".to_string(),
            },
            signed: true,
        };

        let out = run(Commands::Analyze { view }, &mut state).await.unwrap();
        let total: u64 = out["rows"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|row| row["counts"].as_array().unwrap().clone())
            .map(|c| c.as_u64().unwrap())
            .sum();
        assert_eq!(total, 39);
    }

    #[tokio::test]
    async fn test_gex_show_without_snapshot_fails() {
        let (_dir, mut state) = offline_state();
        let action = GexAction::Show {
            symbol: "SPY".to_string(),
            expiry: "20250321".to_string(),
        };
        assert!(run(Commands::Gex { action }, &mut state).await.is_err());
    }
}
