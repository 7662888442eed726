//! Client configuration.
//!
//! The API base URL is resolved in order: an explicit URL
//! (`LUNGVISION_API_URL`), then a local host (`LUNGVISION_HOST`) served on
//! port 5000, then the hosted fallback.

use std::time::Duration;

use thiserror::Error;

pub const API_URL_VAR: &str = "LUNGVISION_API_URL";
pub const HOST_VAR: &str = "LUNGVISION_HOST";
pub const TIMEOUT_VAR: &str = "LUNGVISION_TIMEOUT_SECS";

pub const FALLBACK_API_URL: &str = "https://lungvision.onrender.com/api";
pub const LOCAL_API_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("Invalid API URL {0:?}: expected http:// or https://")]
    InvalidUrl(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Hosts that run the service on the same machine or LAN.
pub fn is_local_host(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host.starts_with("192.168.")
}

/// Pick the API base URL. Never fails; the hosted fallback always applies.
pub fn resolve_base_url(api_url: Option<&str>, host: Option<&str>) -> String {
    if let Some(url) = api_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    match host.map(str::trim) {
        Some(host) if is_local_host(host) => format!("http://{host}:{LOCAL_API_PORT}/api"),
        _ => FALLBACK_API_URL.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Upper bound on a prediction request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: FALLBACK_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> ConfigResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(base_url));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from already-parsed settings, as supplied by flags.
    pub fn from_parts(
        api_url: Option<&str>,
        host: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> ConfigResult<Self> {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(timeout_secs.to_string()));
        }
        Ok(Self::new(resolve_base_url(api_url, host))?
            .with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Build from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            ),
            None => None,
        };
        Self::from_parts(
            lookup(API_URL_VAR).as_deref(),
            lookup(HOST_VAR).as_deref(),
            timeout_secs,
        )
    }

    /// Build from the process environment, after loading `.env` if present.
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_resolve_order() {
        assert_eq!(
            resolve_base_url(Some("https://api.example.org/api/"), Some("localhost")),
            "https://api.example.org/api"
        );
        assert_eq!(
            resolve_base_url(None, Some("192.168.1.20")),
            "http://192.168.1.20:5000/api"
        );
        assert_eq!(resolve_base_url(None, Some("127.0.0.1")), "http://127.0.0.1:5000/api");
        assert_eq!(resolve_base_url(None, Some("lungvision.app")), FALLBACK_API_URL);
        assert_eq!(resolve_base_url(Some("  "), None), FALLBACK_API_URL);
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (HOST_VAR, "localhost"),
            (TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout, Duration::from_secs(5));

        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_invalid_settings() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])),
            Err(ConfigError::InvalidTimeout("soon".into()))
        );
        assert!(ClientConfig::from_parts(None, None, Some(0)).is_err());
        assert_eq!(
            ClientConfig::new("ftp://files"),
            Err(ConfigError::InvalidUrl("ftp://files".into()))
        );
    }

    proptest::proptest! {
        #[test]
        fn remote_hosts_use_fallback(host in "[a-z]{1,12}\\.(com|org|app)") {
            proptest::prop_assert_eq!(resolve_base_url(None, Some(&host)), FALLBACK_API_URL);
        }

        #[test]
        fn lan_hosts_use_port_5000(a in 0u8..=255, b in 0u8..=255) {
            let host = format!("192.168.{a}.{b}");
            proptest::prop_assert_eq!(
                resolve_base_url(None, Some(&host)),
                format!("http://{host}:5000/api")
            );
        }
    }
}
