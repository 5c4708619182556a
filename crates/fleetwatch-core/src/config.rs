// ── Runtime configuration ──
//
// Describes *where* the fleet service lives and how the controller's
// background tasks behave. Never touches disk: fleetwatch-config (or a
// test) builds a `FleetConfig` and hands it in.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// REST endpoint of the hosted fleet service.
pub const DEFAULT_API_URL: &str = "https://case-study-26cf.onrender.com";

/// WebSocket endpoint of the hosted fleet service.
pub const DEFAULT_WS_URL: &str = "wss://case-study-26cf.onrender.com";

/// Seconds between server update rounds; also the dashboard countdown period.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 180;

/// Per-request upper bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetConfig {
    /// REST base URL.
    pub api_url: Url,
    /// WebSocket URL of the push channel.
    pub ws_url: Url,
    /// Request timeout; expiry counts as unreachable.
    pub timeout: Duration,
    /// Open the push channel on connect.
    pub push_enabled: bool,
    /// Periodic vehicle-list refresh. `0` disables it.
    pub refresh_interval_secs: u64,
}

impl FleetConfig {
    /// Build a config for the given endpoints with default tuning.
    pub fn new(api_url: Url, ws_url: Url) -> Self {
        Self {
            api_url,
            ws_url,
            timeout: DEFAULT_TIMEOUT,
            push_enabled: true,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }

    /// Config pointing at the hosted fleet service.
    pub fn hosted() -> Result<Self, CoreError> {
        Ok(Self::new(
            parse_url("api_url", DEFAULT_API_URL)?,
            parse_url("ws_url", DEFAULT_WS_URL)?,
        ))
    }
}

/// Parse a URL, naming the offending field on failure.
pub fn parse_url(field: &str, raw: &str) -> Result<Url, CoreError> {
    Url::parse(raw).map_err(|e| CoreError::Config {
        message: format!("{field}: invalid URL '{raw}': {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hosted_uses_default_endpoints() {
        let config = FleetConfig::hosted().unwrap();
        assert_eq!(config.api_url.as_str(), "https://case-study-26cf.onrender.com/");
        assert_eq!(config.ws_url.scheme(), "wss");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.refresh_interval_secs, 180);
        assert!(config.push_enabled);
    }

    #[test]
    fn parse_url_names_field() {
        let err = parse_url("ws_url", "not a url").unwrap_err();
        assert!(err.to_string().contains("ws_url"));
    }
}
