//! Relay configuration.
//!
//! Values come from `CHAT_RELAY_*` environment variables; anything missing or
//! unparsable falls back to its default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::upstream::DEFAULT_UPSTREAM_URL;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration for the relay server.
///
/// # Example
///
/// ```ignore
/// use chat_relay::config::RelayConfig;
///
/// let config = RelayConfig::from_env()
///     .with_port(8080)
///     .with_upstream_url("http://agents.internal:8000");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Base URL of the agent API
    pub upstream_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Default `tracing` filter; `RUST_LOG` overrides it
    pub log_filter: String,
    /// Frames buffered per request ahead of a slow browser (at least 1)
    pub channel_capacity: usize,
    /// Allowed CORS origins; empty allows any
    pub cors_origins: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            cors_origins: Vec::new(),
        }
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the per-request frame buffer. Zero is raised to one.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let cors_origins = read("CHAT_RELAY_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty() && s != "*")
                    .collect()
            })
            .unwrap_or_default();

        Self {
            upstream_url: read("CHAT_RELAY_UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            host: read("CHAT_RELAY_HOST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.host),
            port: read("CHAT_RELAY_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            log_filter: read("CHAT_RELAY_LOG").unwrap_or(defaults.log_filter),
            channel_capacity: read("CHAT_RELAY_CHANNEL_CAPACITY")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.channel_capacity)
                .max(1),
            cors_origins,
        }
    }
}
