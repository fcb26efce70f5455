//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{LogFormat, ProxyConfig, RelayMode};
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::Operation;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Env {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub const ENV_PORT: &str = "PORT";
pub const ENV_AUTH_ENABLED: &str = "AIPEX_AUTH_ENABLED";
pub const ENV_TOKEN_PREFIX: &str = "AIPEX_TOKEN_PREFIX";
pub const ENV_UPSTREAM_TIMEOUT: &str = "UPSTREAM_TIMEOUT_SECS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "UPSTREAM_ACCEPT_INVALID_CERTS";
pub const ENV_RELAY_MODE: &str = "RELAY_MODE";
pub const ENV_MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";
pub const ENV_METRICS_ADDRESS: &str = "METRICS_ADDRESS";

/// Load configuration: defaults or a TOML file, then environment overrides,
/// then validation.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are treated as unset.
pub fn apply_env<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get(ENV_PORT) {
        let port = parse_value::<u16>(ENV_PORT, &port)?;
        config.listener = crate::config::ListenerConfig::with_port(port);
    }

    for operation in Operation::ALL {
        if let Some(url) = get(operation.env_key()) {
            config.carrier.set_url(operation, Some(url.trim().to_string()));
        }
    }

    if let Some(v) = get(ENV_ACCEPT_INVALID_CERTS) {
        config.carrier.accept_invalid_certs = parse_bool(ENV_ACCEPT_INVALID_CERTS, &v)?;
    }
    if let Some(v) = get(ENV_RELAY_MODE) {
        config.carrier.relay_mode = match v.trim().to_ascii_lowercase().as_str() {
            "buffered" => RelayMode::Buffered,
            "streaming" => RelayMode::Streaming,
            _ => return Err(env_error(ENV_RELAY_MODE, &v, "expected buffered or streaming")),
        };
    }

    if let Some(v) = get(ENV_AUTH_ENABLED) {
        config.auth.enabled = parse_bool(ENV_AUTH_ENABLED, &v)?;
    }
    if let Some(v) = get(ENV_TOKEN_PREFIX) {
        config.auth.token_prefix = v;
    }

    if let Some(v) = get(ENV_UPSTREAM_TIMEOUT) {
        config.timeouts.upstream_secs = parse_value(ENV_UPSTREAM_TIMEOUT, &v)?;
    }
    if let Some(v) = get(ENV_MAX_BODY_BYTES) {
        config.limits.max_body_bytes = parse_value(ENV_MAX_BODY_BYTES, &v)?;
    }

    if let Some(v) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = v;
    }
    if let Some(v) = get(ENV_LOG_FORMAT) {
        config.observability.log_format = match v.trim().to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => return Err(env_error(ENV_LOG_FORMAT, &v, "expected pretty or json")),
        };
    }
    if let Some(v) = get(ENV_METRICS_ENABLED) {
        config.observability.metrics_enabled = parse_bool(ENV_METRICS_ENABLED, &v)?;
    }
    if let Some(v) = get(ENV_METRICS_ADDRESS) {
        config.observability.metrics_address = v;
    }

    Ok(())
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| env_error(key, value, &e.to_string()))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(env_error(key, value, "expected a boolean")),
    }
}

fn env_error(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Env {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
