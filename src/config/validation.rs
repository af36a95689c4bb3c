//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the downstream base URL
//! - Validate value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Missing credentials are not validation errors; they are checked per webhook

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("invalid downstream base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("forward timeout must be greater than zero")]
    ZeroForwardTimeout,

    #[error("request timeout ({request_secs}s) must exceed forward timeout ({forward_secs}s)")]
    RequestTimeoutTooShort { request_secs: u64, forward_secs: u64 },

    #[error("max body size must be greater than zero")]
    ZeroBodyLimit,
}

pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(address) = &config.observability.metrics_address {
        if address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(address.clone()));
        }
    }

    if let Err(reason) = check_base_url(&config.maistro.base_url) {
        errors.push(ValidationError::BaseUrl {
            url: config.maistro.base_url.clone(),
            reason,
        });
    }

    let timeouts = &config.timeouts;
    if timeouts.forward_secs == 0 {
        errors.push(ValidationError::ZeroForwardTimeout);
    } else if timeouts.request_secs <= timeouts.forward_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: timeouts.request_secs,
            forward_secs: timeouts.forward_secs,
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other:?}")),
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot carry path segments".to_string());
    }
    Ok(())
}
