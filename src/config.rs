use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Process configuration, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub integrations_dir: PathBuf,
    pub stocks_snapshot: Option<PathBuf>,
    /// Backend the worker (and any other client) talks to.
    pub api_base_url: String,
    pub probe_interval: Duration,
}

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    8000,
);

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("BIND_ADDR")
            .and_then(|value| match value.parse() {
                Ok(addr) => Some(addr),
                Err(error) => {
                    tracing::warn!(%value, %error, "ignoring invalid BIND_ADDR");
                    None
                }
            })
            .unwrap_or(DEFAULT_BIND_ADDR);
        let integrations_dir = lookup("INTEGRATIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/integrations"));
        let stocks_snapshot = lookup("STOCKS_SNAPSHOT")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let api_base_url =
            lookup("API_BASE_URL").unwrap_or_else(|| "http://127.0.0.1:8000".into());
        let probe_interval = lookup("PROBE_INTERVAL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60 * 60));

        Self {
            bind_addr,
            integrations_dir,
            stocks_snapshot,
            api_base_url,
            probe_interval,
        }
    }
}
