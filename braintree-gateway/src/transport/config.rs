//! Connection settings for the gateway, read from the `[http]` table.
//!
//! A client only ever talks to one gateway host, so the idle pool is a pool
//! of connections to that host. Advanced searches are the slowest calls the
//! gateway serves; the default request timeout leaves room for them.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// Upper bound for `timeout_secs`.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Upper bound for `max_idle_connections`.
pub const MAX_IDLE_CONNECTIONS: usize = 256;

/// `[http]` section of the gateway configuration.
///
/// Every key is optional.
///
/// ```toml
/// [http]
/// timeout_secs = 90          # whole call, 1..=300
/// connect_timeout_secs = 5   # TCP + TLS, at most timeout_secs
/// max_idle_connections = 8   # 0 closes connections after each call
/// compress = true            # ask for gzip responses
/// http_version = "http1"     # "auto", "http1" or "http2"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Limit for a whole gateway call, response body included.
    pub timeout_secs: u64,
    /// Limit for establishing the connection to the gateway.
    pub connect_timeout_secs: u64,
    /// Idle connections kept open to the gateway host.
    pub max_idle_connections: usize,
    /// Whether responses may come back gzip-encoded.
    pub compress: bool,
    /// Protocol used towards the gateway.
    pub http_version: HttpVersion,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            connect_timeout_secs: 10,
            max_idle_connections: 16,
            compress: true,
            http_version: HttpVersion::default(),
        }
    }
}

impl HttpConfig {
    /// Checks the section against the limits the client accepts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] naming the offending key when a
    /// timeout is zero, `timeout_secs` exceeds [`MAX_TIMEOUT_SECS`], the
    /// connect timeout is longer than the call timeout, or the idle pool
    /// exceeds [`MAX_IDLE_CONNECTIONS`].
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(invalid(format!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            )));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > self.timeout_secs {
            return Err(invalid(format!(
                "connect_timeout_secs must be between 1 and timeout_secs ({}), got {}",
                self.timeout_secs, self.connect_timeout_secs
            )));
        }
        if self.max_idle_connections > MAX_IDLE_CONNECTIONS {
            return Err(invalid(format!(
                "max_idle_connections must be at most {MAX_IDLE_CONNECTIONS}, got {}",
                self.max_idle_connections
            )));
        }
        Ok(())
    }

    /// Call timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn invalid(message: String) -> GatewayError {
    GatewayError::ConfigError(format!("[http] {message}"))
}

/// Protocol used towards the gateway.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 without negotiation, for gateways known to speak it.
    Http2,
    /// Let TLS negotiation pick.
    #[default]
    Auto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(config.compress);
        assert_eq!(config.http_version, HttpVersion::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: HttpConfig = toml::from_str("timeout_secs = 90\ncompress = false").unwrap();
        assert_eq!(config.timeout_secs, 90);
        assert!(!config.compress);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.max_idle_connections, 16);

        let empty: HttpConfig = toml::from_str("").unwrap();
        assert_eq!(empty, HttpConfig::default());
    }

    #[test]
    fn test_unknown_keys_and_versions_rejected() {
        assert!(toml::from_str::<HttpConfig>("proxy = \"socks5://x\"").is_err());
        assert!(toml::from_str::<HttpConfig>("http_version = \"http3\"").is_err());
    }

    #[test]
    fn test_connect_timeout_bounded_by_call_timeout() {
        let equal =
            HttpConfig { timeout_secs: 5, connect_timeout_secs: 5, ..HttpConfig::default() };
        assert!(equal.validate().is_ok());

        let config = HttpConfig { connect_timeout_secs: 6, ..equal };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn test_validate_bounds() {
        let edge = HttpConfig {
            timeout_secs: MAX_TIMEOUT_SECS,
            max_idle_connections: 0,
            ..HttpConfig::default()
        };
        assert!(edge.validate().is_ok());

        for config in [
            HttpConfig { timeout_secs: 0, ..HttpConfig::default() },
            HttpConfig { timeout_secs: MAX_TIMEOUT_SECS + 1, ..HttpConfig::default() },
            HttpConfig { connect_timeout_secs: 0, ..HttpConfig::default() },
            HttpConfig { max_idle_connections: MAX_IDLE_CONNECTIONS + 1, ..HttpConfig::default() },
        ] {
            let err = config.validate().unwrap_err();
            assert!(matches!(&err, GatewayError::ConfigError(msg) if msg.starts_with("[http]")));
        }
    }
}
