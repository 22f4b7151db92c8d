//! Application configuration loaded from environment variables.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use integration::ServiceUrls;

/// How the composite talks to the leaf services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportMode {
    /// Request/response calls, secondary reads issued one after another.
    #[default]
    Blocking,
    /// Request/response calls against the reactive endpoints, reads issued
    /// concurrently.
    Reactive,
    /// Writes published as events, reads as in `Reactive`.
    Event,
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocking" => Ok(TransportMode::Blocking),
            "reactive" => Ok(TransportMode::Reactive),
            "event" => Ok(TransportMode::Event),
            other => Err(format!("unknown transport mode: {other}")),
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Blocking => write!(f, "blocking"),
            TransportMode::Reactive => write!(f, "reactive"),
            TransportMode::Event => write!(f, "event"),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`, `PORT`: bind address (default `0.0.0.0:7000`)
/// - `RUST_LOG`: tracing filter directive (default `info`)
/// - `PRODUCT_SERVICE_HOST`/`_PORT` (default `localhost:7001`)
/// - `RECOMMENDATION_SERVICE_HOST`/`_PORT` (default `localhost:7002`)
/// - `REVIEW_SERVICE_HOST`/`_PORT` (default `localhost:7003`)
/// - `DOWNSTREAM_TIMEOUT_MS`: per-call timeout (default `2000`)
/// - `TRANSPORT_MODE`: `blocking`, `reactive` or `event` (default `blocking`)
/// - `EVENT_CHANNEL_CAPACITY`: buffered events per channel (default `1024`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub product_host: String,
    pub product_port: u16,
    pub recommendation_host: String,
    pub recommendation_port: u16,
    pub review_host: String,
    pub review_port: u16,
    pub downstream_timeout: Duration,
    pub transport_mode: TransportMode,
    pub event_channel_capacity: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", defaults.host),
            port: parsed_or("PORT", defaults.port),
            log_level: env_or("RUST_LOG", defaults.log_level),
            product_host: env_or("PRODUCT_SERVICE_HOST", defaults.product_host),
            product_port: parsed_or("PRODUCT_SERVICE_PORT", defaults.product_port),
            recommendation_host: env_or(
                "RECOMMENDATION_SERVICE_HOST",
                defaults.recommendation_host,
            ),
            recommendation_port: parsed_or(
                "RECOMMENDATION_SERVICE_PORT",
                defaults.recommendation_port,
            ),
            review_host: env_or("REVIEW_SERVICE_HOST", defaults.review_host),
            review_port: parsed_or("REVIEW_SERVICE_PORT", defaults.review_port),
            downstream_timeout: Duration::from_millis(parsed_or(
                "DOWNSTREAM_TIMEOUT_MS",
                defaults.downstream_timeout.as_millis() as u64,
            )),
            transport_mode: parsed_or("TRANSPORT_MODE", defaults.transport_mode),
            event_channel_capacity: parsed_or(
                "EVENT_CHANNEL_CAPACITY",
                defaults.event_channel_capacity,
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Address this instance reports in aggregates it builds.
    pub fn service_address(&self) -> String {
        common::service_address(&self.host, self.port)
    }

    pub fn product_url(&self) -> String {
        format!("http://{}:{}", self.product_host, self.product_port)
    }

    pub fn recommendation_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.recommendation_host, self.recommendation_port
        )
    }

    pub fn review_url(&self) -> String {
        format!("http://{}:{}", self.review_host, self.review_port)
    }

    pub fn service_urls(&self) -> ServiceUrls {
        ServiceUrls::new(
            self.product_url(),
            self.recommendation_url(),
            self.review_url(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7000,
            log_level: "info".to_string(),
            product_host: "localhost".to_string(),
            product_port: 7001,
            recommendation_host: "localhost".to_string(),
            recommendation_port: 7002,
            review_host: "localhost".to_string(),
            review_port: 7003,
            downstream_timeout: Duration::from_millis(2000),
            transport_mode: TransportMode::Blocking,
            event_channel_capacity: 1024,
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parsed_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    parse_or(key, std::env::var(key).ok(), default)
}

/// Parses a set variable, warning and keeping `default` when it is malformed.
fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring malformed setting, using default");
            default
        }
    }
}
