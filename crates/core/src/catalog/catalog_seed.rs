use voldesk_market_data::Instrument;

/// Built-in instruments offered at startup.
///
/// Futures carry no contract month: the resolver selects the listed contract.
pub(super) fn seed_instruments() -> Vec<Instrument> {
    vec![
        // US indices & vol
        Instrument::index("SPX", "CBOE", "USD"),
        Instrument::index("NDX", "NASDAQ", "USD"),
        Instrument::index("RUT", "RUSSELL", "USD"),
        Instrument::index("VIX", "CBOE", "USD"),
        Instrument::index("VXN", "CBOE", "USD"),
        Instrument::index("RVX", "CBOE", "USD"),
        // Index futures
        Instrument::future("ES", "CME", "USD"),
        Instrument::future("NQ", "CME", "USD"),
        Instrument::future("RTY", "CME", "USD"),
        Instrument::future("YM", "CBOT", "USD"),
        // Commodity futures
        Instrument::future("GC", "COMEX", "USD"),
        Instrument::future("CL", "NYMEX", "USD"),
        Instrument::future("SI", "COMEX", "USD")
            .with_trading_class("SI")
            .with_multiplier("5000"),
        // US ETFs
        Instrument::stock("SPY", "SMART", "USD"),
        Instrument::stock("QQQ", "SMART", "USD"),
        Instrument::stock("IWM", "SMART", "USD"),
        Instrument::stock("GLD", "SMART", "USD"),
        Instrument::stock("SLV", "SMART", "USD"),
        Instrument::stock("USO", "SMART", "USD"),
        Instrument::stock("UUP", "SMART", "USD"),
        Instrument::stock("FXE", "SMART", "USD"),
        Instrument::stock("FXY", "SMART", "USD"),
        // US mega caps
        Instrument::stock("AAPL", "SMART", "USD"),
        Instrument::stock("AMZN", "SMART", "USD"),
        Instrument::stock("META", "SMART", "USD"),
        Instrument::stock("GOOGL", "SMART", "USD"),
        Instrument::stock("MSFT", "SMART", "USD"),
        Instrument::stock("NVDA", "SMART", "USD"),
        Instrument::stock("TSLA", "SMART", "USD"),
        // Europe
        Instrument::index("ESTX50", "EUREX", "EUR"),
        Instrument::index("DAX", "EUREX", "EUR"),
        Instrument::index("CAC40", "MONEP", "EUR"),
        Instrument::index("V2TX", "EUREX", "EUR"),
    ]
}
