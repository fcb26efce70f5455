//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected and
//! returned together so a broken deployment is fixed in one pass.
//! An unset carrier URL is not an error: the matching operation answers 500
//! at request time instead.

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::routing::Operation;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },

    #[error("{key} must use http or https, got {scheme}")]
    UnsupportedScheme { key: &'static str, scheme: String },

    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("invalid metrics address {0}")]
    InvalidMetricsAddress(String),

    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,

    #[error("max body size must be greater than zero")]
    ZeroBodyLimit,

    #[error("token prefix must not be empty")]
    EmptyTokenPrefix,
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for operation in Operation::ALL {
        if let Some(raw) = config.carrier.url_for(operation) {
            if let Err(e) = check_upstream_url(operation.env_key(), raw) {
                errors.push(e);
            }
        }
    }

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.auth.token_prefix.is_empty() {
        errors.push(ValidationError::EmptyTokenPrefix);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(key: &'static str, raw: &str) -> Result<(), ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        key,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::UnsupportedScheme {
            key,
            scheme: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.carrier.create_url = Some("not a url".into());
        config.carrier.track_url = Some("ftp://carrier.example/track".into());
        config.carrier.label_url = Some("https://carrier.example/label?x=1".into());
        config.timeouts.upstream_secs = 0;
        config.auth.token_prefix.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(
            errors[0],
            ValidationError::InvalidUrl { key: "CARRIER_CREATE_URL", .. }
        ));
        assert_eq!(
            errors[1],
            ValidationError::UnsupportedScheme {
                key: "CARRIER_TRACK_URL",
                scheme: "ftp".into()
            }
        );
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::EmptyTokenPrefix));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidMetricsAddress("nowhere".into())]
        );
    }
}
