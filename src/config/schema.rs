//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the middleman.
//! All types derive Serde traits for deserialization from config files; the
//! environment overrides in `loader.rs` are applied on top.

use serde::{Deserialize, Serialize};

use crate::routing::Operation;

/// Root configuration for the middleman.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Carrier upstream targets and client behaviour.
    pub carrier: CarrierConfig,

    /// Rotating token gate.
    pub auth: AuthConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Bind on all interfaces at the given port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_address: format!("0.0.0.0:{}", port),
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::with_port(3000)
    }
}

/// How the upstream response body is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    /// Read the whole body before responding. A truncated upstream transfer
    /// becomes a 502.
    #[default]
    Buffered,
    /// Relay headers as soon as they arrive and forward body chunks as they
    /// are received.
    Streaming,
}

/// Carrier upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CarrierConfig {
    /// Target for `/shipment/create`.
    pub create_url: Option<String>,

    /// Target for `/shipment/track`.
    pub track_url: Option<String>,

    /// Target for `/shipment/label`.
    pub label_url: Option<String>,

    /// Skip TLS certificate verification of the carrier.
    pub accept_invalid_certs: bool,

    /// Response relay mode.
    pub relay_mode: RelayMode,
}

impl CarrierConfig {
    /// Configured upstream URL for an operation, if any.
    pub fn url_for(&self, operation: Operation) -> Option<&str> {
        match operation {
            Operation::Create => self.create_url.as_deref(),
            Operation::Track => self.track_url.as_deref(),
            Operation::Label => self.label_url.as_deref(),
        }
    }

    /// Set the upstream URL for an operation.
    pub fn set_url(&mut self, operation: Operation, url: Option<String>) {
        let slot = match operation {
            Operation::Create => &mut self.create_url,
            Operation::Track => &mut self.track_url,
            Operation::Label => &mut self.label_url,
        };
        *slot = url;
    }
}

/// Rotating token gate configuration.
///
/// The token is derived from the current UTC date and is not a credential;
/// it only keeps casual callers out.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require the rotating token on shipment paths.
    pub enabled: bool,

    /// Token prefix (`<prefix>_<YYYY-MM-DD>_<weekday>`).
    pub token_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token_prefix: crate::security::token::DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream deadline in seconds (connect + response).
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { upstream_secs: 90 }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
