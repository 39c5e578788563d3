//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (deadlines > 0, backoff bounds ordered)
//! - Check peer addresses and the listen address parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;
use crate::load_balancer::peers::uppercase_url;

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("proxy.peers: {0}")]
    Peer(String),

    #[error("proxy.max_time_ms must be greater than zero")]
    ZeroMaxTime,

    #[error("proxy.max_attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("proxy.base_delay_ms ({base}) exceeds proxy.max_delay_ms ({max})")]
    BackoffBounds { base: u64, max: u64 },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_namespace {0:?} is not a valid metric prefix")]
    MetricsNamespace(String),
}

/// Check a configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    for peer in &config.proxy.peers {
        if peer.trim().is_empty() {
            errors.push(ValidationError::Peer("empty peer address".to_string()));
        } else if let Err(e) = uppercase_url(peer.trim()) {
            errors.push(ValidationError::Peer(e.to_string()));
        }
    }

    if config.proxy.max_time_ms == 0 {
        errors.push(ValidationError::ZeroMaxTime);
    }
    if config.proxy.max_attempts == Some(0) {
        errors.push(ValidationError::ZeroMaxAttempts);
    }
    if config.proxy.base_delay_ms > config.proxy.max_delay_ms {
        errors.push(ValidationError::BackoffBounds {
            base: config.proxy.base_delay_ms,
            max: config.proxy.max_delay_ms,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if !is_metric_prefix(&config.observability.metrics_namespace) {
        errors.push(ValidationError::MetricsNamespace(
            config.observability.metrics_namespace.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn is_metric_prefix(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = ":8080".into();
        config.proxy.peers = vec!["localhost:8001".into(), " ".into()];
        config.proxy.max_time_ms = 0;
        config.proxy.base_delay_ms = 500;
        config.observability.metrics_namespace = "9lives".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress(":8080".into()),
                ValidationError::Peer("empty peer address".into()),
                ValidationError::ZeroMaxTime,
                ValidationError::BackoffBounds { base: 500, max: 100 },
                ValidationError::MetricsNamespace("9lives".into()),
            ]
        );
    }

    #[test]
    fn test_metric_prefix() {
        assert!(is_metric_prefix("string_service"));
        assert!(is_metric_prefix("_x1"));
        assert!(!is_metric_prefix(""));
        assert!(!is_metric_prefix("my-group"));
    }
}
