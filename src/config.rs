//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable                | Default         |
//! |-------------------------|-----------------|
//! | `LISTEN_ADDR`           | `0.0.0.0:3000`  |
//! | `OUTBOUND_BUFFER`       | `16`            |
//! | `TIMER_MAX_INTERVAL_MS` | `86400000`      |
//! | `LOG_FORMAT`            | `text`          |

use std::net::SocketAddr;

use crate::domain::connection_registry::DEFAULT_OUTBOUND_CAPACITY;
use crate::domain::interval::DEFAULT_MAX_INTERVAL_MS;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Undelivered events buffered per connection before ticks are dropped.
    pub outbound_buffer: usize,

    /// Largest interval a client may subscribe with, in milliseconds.
    pub max_interval_ms: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl GatewayConfig {
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

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is present but not a valid
    /// [`SocketAddr`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, std::net::AddrParseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()?;

        let outbound_buffer =
            parse_or(lookup("OUTBOUND_BUFFER"), DEFAULT_OUTBOUND_CAPACITY).max(1);
        let max_interval_ms =
            parse_or(lookup("TIMER_MAX_INTERVAL_MS"), DEFAULT_MAX_INTERVAL_MS).max(1);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            outbound_buffer,
            max_interval_ms,
            log_format,
        })
    }
}

/// Parses `raw` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}
