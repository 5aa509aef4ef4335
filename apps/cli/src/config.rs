use std::time::Duration;

use rand::Rng;
use voldesk_market_data::{GatewayConfig, SettlePolicy};
use voldesk_storage_sqlite::DEFAULT_DB_PATH;

pub struct Config {
    pub db_path: String,
    pub gateway_host: String,
    pub gateway_port: u16,
    pub client_id: u32,
    pub connect_timeout: Duration,
    pub settle_timeout: Duration,
    pub poll_interval: Duration,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a variable lookup. Unparsable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let db_path = lookup("VD_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let gateway_host = lookup("VD_GATEWAY_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let gateway_port = lookup("VD_GATEWAY_PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(7497);
        // Ids must be unique among sessions attached to the terminal
        let client_id = lookup("VD_CLIENT_ID")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_else(|| rand::thread_rng().gen_range(100..=999));
        let log_format = lookup("VD_LOG_FORMAT").unwrap_or_else(|| "text".into());

        Self {
            db_path,
            gateway_host,
            gateway_port,
            client_id,
            connect_timeout: Duration::from_millis(number("VD_CONNECT_TIMEOUT_MS", 5000)),
            settle_timeout: Duration::from_millis(number("VD_SETTLE_TIMEOUT_MS", 4000)),
            poll_interval: Duration::from_millis(number("VD_POLL_INTERVAL_MS", 250)),
            log_format,
        }
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            host: self.gateway_host.clone(),
            port: self.gateway_port,
            client_id: self.client_id,
            timeout: self.connect_timeout,
        }
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        SettlePolicy::new(self.settle_timeout, self.poll_interval)
    }
}
