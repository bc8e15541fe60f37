//! Portal configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). The store connection attributes decide the operating mode:
//! when any of [`REQUIRED_STORE_KEYS`] is missing or empty the service runs
//! against the demo dataset.

use std::net::SocketAddr;
use std::time::Duration;

use crate::store::RetryPolicy;

/// Connection attributes that must all be present for live mode.
pub const REQUIRED_STORE_KEYS: [&str; 3] = ["PORTAL_DB_HOST", "PORTAL_DB_NAME", "PORTAL_DB_USER"];

/// Log output format for `tracing-subscriber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per line.
    Json,
}

/// Connection attributes for the live store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Database host name.
    pub host: Option<String>,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub database: Option<String>,
    /// Login role.
    pub user: Option<String>,
    /// Password, if the server requires one.
    pub password: Option<String>,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Timeout in seconds for acquiring a connection.
    pub connect_timeout_secs: u64,
}

impl StoreSettings {
    /// Names of required attributes that are not set.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let [host_key, name_key, user_key] = REQUIRED_STORE_KEYS;
        [
            (host_key, &self.host),
            (name_key, &self.database),
            (user_key, &self.user),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect()
    }

    /// Returns `true` when every required attribute is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing_keys().is_empty()
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`PortalConfig::from_env`].
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Log output format.
    pub log_format: LogFormat,

    /// Live store connection attributes.
    pub store: StoreSettings,

    /// Retry budget for the registration transaction.
    pub retry: RetryPolicy,
}

impl PortalConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, std::net::AddrParseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = get("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()?;

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Plain,
        };

        let store = StoreSettings {
            host: get("PORTAL_DB_HOST"),
            port: parse_or(get("PORTAL_DB_PORT"), 5432),
            database: get("PORTAL_DB_NAME"),
            user: get("PORTAL_DB_USER"),
            password: get("PORTAL_DB_PASSWORD"),
            max_connections: parse_or(get("PORTAL_DB_MAX_CONNECTIONS"), 10),
            connect_timeout_secs: parse_or(get("PORTAL_DB_CONNECT_TIMEOUT_SECS"), 5),
        };

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: parse_or(get("PORTAL_TX_MAX_ATTEMPTS"), defaults.max_attempts),
            base_delay: get("PORTAL_TX_BACKOFF_BASE_MS")
                .and_then(|v| v.parse().ok())
                .map_or(defaults.base_delay, Duration::from_millis),
            max_delay: get("PORTAL_TX_BACKOFF_MAX_MS")
                .and_then(|v| v.parse().ok())
                .map_or(defaults.max_delay, Duration::from_millis),
        };

        Ok(Self {
            listen_addr,
            log_format,
            store,
            retry,
        })
    }
}

/// Parses an optional raw value as `T`, returning `default` on missing
/// or invalid values.
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> PortalConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let Ok(config) = PortalConfig::from_lookup(|key| vars.get(key).cloned()) else {
            panic!("config should load");
        };
        config
    }

    #[test]
    fn defaults_without_environment() {
        let config = load(&[]);
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.log_format, LogFormat::Plain);
        assert_eq!(config.store.port, 5432);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.store.missing_keys(), REQUIRED_STORE_KEYS.to_vec());
        assert!(!config.store.is_configured());
    }

    #[test]
    fn all_required_keys_switch_to_live() {
        let config = load(&[
            ("PORTAL_DB_HOST", "db.internal"),
            ("PORTAL_DB_NAME", "events"),
            ("PORTAL_DB_USER", "portal"),
        ]);
        assert!(config.store.is_configured());
    }

    #[test]
    fn empty_values_count_as_missing() {
        let config = load(&[
            ("PORTAL_DB_HOST", "db.internal"),
            ("PORTAL_DB_NAME", ""),
            ("PORTAL_DB_USER", "portal"),
        ]);
        assert_eq!(config.store.missing_keys(), vec!["PORTAL_DB_NAME"]);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = load(&[
            ("PORTAL_DB_PORT", "not-a-port"),
            ("PORTAL_TX_MAX_ATTEMPTS", "9"),
            ("PORTAL_TX_BACKOFF_BASE_MS", "oops"),
            ("LOG_FORMAT", "json"),
        ]);
        assert_eq!(config.store.port, 5432);
        assert_eq!(config.retry.max_attempts, 9);
        assert_eq!(config.retry.base_delay, RetryPolicy::default().base_delay);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_listen_addr_is_an_error() {
        let result = PortalConfig::from_lookup(|key| {
            (key == "LISTEN_ADDR").then(|| "nowhere".to_string())
        });
        assert!(result.is_err());
    }
}
