//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::booking::WebhookConfig;
use crate::planner::{DEFAULT_MIN_CONNECTION_MINS, SearchConfig};

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);
const DEFAULT_NETWORK_FILE: &str = "data/network.json";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub network_file: PathBuf,
    pub search: SearchConfig,
    /// Confirmations are only logged when unset.
    pub webhook: Option<WebhookConfig>,
}

impl AppConfig {
    /// Read `RAIL_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup.
    ///
    /// Unparseable values are logged and replaced by their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr =
            parsed(&lookup, "RAIL_BIND_ADDR").unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR));
        let network_file = lookup("RAIL_NETWORK_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NETWORK_FILE));
        let min_connection_mins = parsed::<i64>(&lookup, "RAIL_MIN_CONNECTION_MINS")
            .filter(|mins| {
                let ok = *mins >= 0;
                if !ok {
                    warn!(value = mins, "negative RAIL_MIN_CONNECTION_MINS, using default");
                }
                ok
            })
            .unwrap_or(DEFAULT_MIN_CONNECTION_MINS);

        let webhook = lookup("RAIL_NOTIFY_WEBHOOK_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|url| {
                let timeout = parsed(&lookup, "RAIL_NOTIFY_TIMEOUT_SECS")
                    .unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECS);
                let config = WebhookConfig::new(url).with_timeout(timeout);
                match lookup("RAIL_NOTIFY_API_KEY") {
                    Some(key) => config.with_api_key(key),
                    None => config,
                }
            });

        Self {
            bind_addr,
            network_file,
            search: SearchConfig {
                min_connection_mins,
                ..SearchConfig::default()
            },
            webhook,
        }
    }
}

/// Parse `key` if set, warning and returning `None` when it is malformed.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.network_file, PathBuf::from("data/network.json"));
        assert_eq!(config.search.min_connection_mins, 30);
        assert!(config.search.connections_require_auth);
        assert!(config.webhook.is_none());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("RAIL_BIND_ADDR", "0.0.0.0:8080"),
            ("RAIL_NETWORK_FILE", "/srv/rail/network.json"),
            ("RAIL_MIN_CONNECTION_MINS", "45"),
            ("RAIL_NOTIFY_WEBHOOK_URL", "https://mail.example.com/send"),
            ("RAIL_NOTIFY_API_KEY", "secret"),
            ("RAIL_NOTIFY_TIMEOUT_SECS", "3"),
        ]);

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.network_file, PathBuf::from("/srv/rail/network.json"));
        assert_eq!(config.search.min_connection_mins, 45);

        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url, "https://mail.example.com/send");
        assert_eq!(webhook.api_key.as_deref(), Some("secret"));
        assert_eq!(webhook.timeout_secs, 3);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[
            ("RAIL_BIND_ADDR", "not an address"),
            ("RAIL_MIN_CONNECTION_MINS", "-5"),
            ("RAIL_NOTIFY_WEBHOOK_URL", "https://mail.example.com/send"),
            ("RAIL_NOTIFY_TIMEOUT_SECS", "soon"),
        ]);

        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.search.min_connection_mins, 30);
        assert_eq!(config.webhook.unwrap().timeout_secs, 10);

        let config = self::config(&[("RAIL_MIN_CONNECTION_MINS", "abc")]);
        assert_eq!(config.search.min_connection_mins, DEFAULT_MIN_CONNECTION_MINS);
    }
}
