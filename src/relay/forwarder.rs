//! Outbound relay to the downstream automation API.
//!
//! # Responsibilities
//! - Build the instance-specific endpoint URL
//! - Issue exactly one POST carrying the verified bytes unchanged
//! - Classify every failure into a `(status, body)` pair
//!
//! # Design Decisions
//! - No retries: one attempt per webhook
//! - A completed exchange is returned as-is whatever its status
//! - Connection-level failures (DNS, TCP, TLS, timeout) synthesize 502
//! - Anything else that goes wrong synthesizes 500

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::RelayConfig;
use crate::observability::metrics;

pub const HEADER_API_KEY: &str = "apikey";
pub const HEADER_OVERRIDE_SCHEMA: &str = "overrideschema";
pub const HEADER_OVERRIDE_AGENT: &str = "overrideagent";
pub const HEADER_DEBUG: &str = "debug";

/// Error text returned when the downstream API could not be reached.
pub const CONNECTIVITY_ERROR: &str = "Failed to connect to Maistro API";

/// Errors building a [`Forwarder`].
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid downstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("downstream base URL cannot carry path segments")]
    CannotBeABase,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result of the single outbound attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The exchange completed; any status, including 4xx/5xx.
    Delivered { status: u16, body: String },

    /// The request never completed (DNS, TCP, TLS or timeout).
    Unreachable(String),

    /// Any other failure, e.g. an unbuildable request.
    Failed(String),
}

impl ForwardOutcome {
    pub fn status(&self) -> u16 {
        match self {
            ForwardOutcome::Delivered { status, .. } => *status,
            ForwardOutcome::Unreachable(_) => 502,
            ForwardOutcome::Failed(_) => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Status and body as reported back to the sender.
    pub fn into_parts(self) -> (u16, String) {
        let status = self.status();
        let body = match self {
            ForwardOutcome::Delivered { body, .. } => body,
            ForwardOutcome::Unreachable(_) => json!({ "error": CONNECTIVITY_ERROR }).to_string(),
            ForwardOutcome::Failed(reason) => json!({ "error": reason }).to_string(),
        };
        (status, body)
    }
}

/// HTTP client bound to one downstream base URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    base_url: Url,
}

impl Forwarder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ForwardError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ForwardError::CannotBeABase);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("webhook-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, ForwardError> {
        Self::new(
            &config.maistro.base_url,
            Duration::from_secs(config.timeouts.forward_secs),
        )
    }

    /// `{base_url}/{instance_id}/maistro`, with `instance_id` percent-encoded
    /// as a single path segment.
    pub fn endpoint(&self, instance_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(instance_id).push("maistro");
        }
        url
    }

    /// POST `payload` to the instance endpoint. Never fails; see [`ForwardOutcome`].
    pub async fn forward(
        &self,
        payload: &[u8],
        api_key: &str,
        override_agent: &str,
        debug: &str,
        instance_id: &str,
    ) -> ForwardOutcome {
        let started = Instant::now();
        let url = self.endpoint(instance_id);

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(HEADER_API_KEY, api_key)
            .header(HEADER_OVERRIDE_SCHEMA, "true")
            .header(HEADER_OVERRIDE_AGENT, override_agent)
            .header(HEADER_DEBUG, debug)
            .body(payload.to_vec());

        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => ForwardOutcome::Delivered { status, body },
                    Err(e) => classify(e),
                }
            }
            Err(e) => classify(e),
        };

        match &outcome {
            ForwardOutcome::Delivered { status, .. } if outcome.is_success() => {
                tracing::debug!(status, "Downstream accepted payload");
            }
            ForwardOutcome::Delivered { status, body } => {
                tracing::warn!(status, error = %body, "HTTP error forwarding to Maistro");
            }
            ForwardOutcome::Unreachable(reason) => {
                tracing::error!(error = %reason, "Connection error forwarding to Maistro");
            }
            ForwardOutcome::Failed(reason) => {
                tracing::error!(error = %reason, "Unexpected error forwarding to Maistro");
            }
        }

        metrics::record_forward(outcome.status(), started);
        outcome
    }
}

fn classify(err: reqwest::Error) -> ForwardOutcome {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ForwardOutcome::Unreachable(err.to_string())
    } else {
        ForwardOutcome::Failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarder(base: &str) -> Forwarder {
        Forwarder::new(base, Duration::from_secs(25)).unwrap()
    }

    #[test]
    fn test_endpoint_template() {
        let f = forwarder("https://api-usw.neuralseek.com/v1");
        assert_eq!(
            f.endpoint("acme").as_str(),
            "https://api-usw.neuralseek.com/v1/acme/maistro"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let f = forwarder("http://127.0.0.1:9000/v1/");
        assert_eq!(f.endpoint("acme").as_str(), "http://127.0.0.1:9000/v1/acme/maistro");
    }

    #[test]
    fn test_endpoint_encodes_instance_id() {
        let f = forwarder("http://localhost/v1");
        assert_eq!(
            f.endpoint("a/b c").as_str(),
            "http://localhost/v1/a%2Fb%20c/maistro"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(
            Forwarder::new("mailto:ops@example.com", Duration::from_secs(1)),
            Err(ForwardError::CannotBeABase)
        ));
        assert!(matches!(
            Forwarder::new("::", Duration::from_secs(1)),
            Err(ForwardError::BaseUrl(_))
        ));
    }

    #[test]
    fn test_outcome_parts() {
        let delivered = ForwardOutcome::Delivered {
            status: 422,
            body: "{\"error\":\"bad agent\"}".into(),
        };
        assert!(!delivered.is_success());
        assert_eq!(delivered.into_parts(), (422, "{\"error\":\"bad agent\"}".to_string()));

        let (status, body) = ForwardOutcome::Unreachable("dns error".into()).into_parts();
        assert_eq!(status, 502);
        assert_eq!(body, json!({ "error": CONNECTIVITY_ERROR }).to_string());

        let (status, body) = ForwardOutcome::Failed("builder error".into()).into_parts();
        assert_eq!(status, 500);
        assert_eq!(body, "{\"error\":\"builder error\"}");
    }

    #[test]
    fn test_success_range() {
        for (status, ok) in [(199, false), (200, true), (204, true), (299, true), (300, false)] {
            let outcome = ForwardOutcome::Delivered { status, body: String::new() };
            assert_eq!(outcome.is_success(), ok, "status {status}");
        }
    }
}
