//! Webhook orchestration.
//!
//! Every webhook ends in exactly one [`RelayResponse`]:
//!
//! ```text
//! credentials missing         → 500 Configuration error
//! no signature header         → 401 Missing signature header
//! undecodable / bad signature → 401 Invalid signature
//! downstream 2xx              → 200 {message, maistro_status}
//! anything else downstream    → 200 {message, maistro_status, error}
//! ```

use crate::config::RelayConfig;
use crate::http::headers::{HEADER_HMAC, HEADER_SHOP_DOMAIN, HEADER_TOPIC};
use crate::http::request::InboundRequest;
use crate::http::response::RelayResponse;
use crate::observability::metrics::{self, Outcome};
use crate::relay::forwarder::Forwarder;
use crate::security::signature;

/// Authenticate one webhook and relay it downstream.
pub async fn handle(
    config: &RelayConfig,
    forwarder: &Forwarder,
    request: InboundRequest,
) -> RelayResponse {
    let (outcome, response) = process(config, forwarder, &request).await;
    metrics::record_webhook(outcome);
    response
}

async fn process(
    config: &RelayConfig,
    forwarder: &Forwarder,
    request: &InboundRequest,
) -> (Outcome, RelayResponse) {
    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(error = %e, "Missing required configuration");
            return (Outcome::ConfigError, RelayResponse::configuration_error());
        }
    };

    let Some(provided) = request.headers.get_non_empty(HEADER_HMAC) else {
        tracing::warn!(header = HEADER_HMAC, "Missing signature header");
        return (Outcome::MissingSignature, RelayResponse::missing_signature());
    };

    let payload = match request.decode_body() {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook body is not valid base64");
            return (Outcome::InvalidSignature, RelayResponse::invalid_signature());
        }
    };

    if !signature::verify(&payload, provided, credentials.shopify_secret.expose_secret()) {
        tracing::warn!("Invalid webhook signature");
        return (Outcome::InvalidSignature, RelayResponse::invalid_signature());
    }

    let topic = request.headers.get(HEADER_TOPIC).unwrap_or("unknown");
    let shop_domain = request.headers.get(HEADER_SHOP_DOMAIN).unwrap_or("unknown");
    tracing::info!(topic, shop_domain, bytes = payload.len(), "Webhook signature verified");

    let outcome = forwarder
        .forward(
            &payload,
            credentials.api_key.expose_secret(),
            &config.maistro.override_agent,
            &config.maistro.debug,
            credentials.instance_id,
        )
        .await;

    if outcome.is_success() {
        let status = outcome.status();
        tracing::info!(maistro_status = status, "Forwarded webhook to Maistro");
        (Outcome::Forwarded, RelayResponse::forwarded(status))
    } else {
        let (status, error) = outcome.into_parts();
        tracing::warn!(maistro_status = status, "Failed to forward webhook to Maistro");
        (Outcome::ForwardFailed, RelayResponse::forward_failed(status, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CredentialSources, Secret};
    use crate::http::headers::Headers;
    use axum::http::StatusCode;
    use std::time::Duration;

    // Port 9 (discard) on localhost; nothing here is ever reached because
    // every test below stops before forwarding.
    fn forwarder() -> Forwarder {
        Forwarder::new("http://127.0.0.1:9/v1", Duration::from_secs(1)).unwrap()
    }

    fn configured() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.credentials = CredentialSources {
            shopify_secret: Some(Secret::new("secret".into())),
            api_key: Some(Secret::new("key".into())),
            instance_id: Some("acme".into()),
        };
        config
    }

    #[tokio::test]
    async fn test_configuration_checked_before_signature() {
        let request = InboundRequest::new(Headers::new(), "{}", false);
        let response = handle(&RelayConfig::default(), &forwarder(), request).await;
        assert_eq!(response, RelayResponse::configuration_error());
    }

    #[tokio::test]
    async fn test_missing_and_empty_signature() {
        let request = InboundRequest::new(Headers::new(), "{}", false);
        let response = handle(&configured(), &forwarder(), request).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response, RelayResponse::missing_signature());

        let headers: Headers = [(HEADER_HMAC, "")].into_iter().collect();
        let request = InboundRequest::new(headers, "{}", false);
        let response = handle(&configured(), &forwarder(), request).await;
        assert_eq!(response, RelayResponse::missing_signature());
    }

    #[tokio::test]
    async fn test_bad_base64_body_is_invalid_signature() {
        let headers: Headers = [(HEADER_HMAC, "anything")].into_iter().collect();
        let request = InboundRequest::new(headers, "e30", true);
        let response = handle(&configured(), &forwarder(), request).await;
        assert_eq!(response, RelayResponse::invalid_signature());
    }

    #[tokio::test]
    async fn test_wrong_signature() {
        let digest = signature::compute_signature(b"{}", "other-secret").unwrap();
        let headers: Headers = [(HEADER_HMAC, digest)].into_iter().collect();
        let request = InboundRequest::new(headers, "{}", false);
        let response = handle(&configured(), &forwarder(), request).await;
        assert_eq!(response, RelayResponse::invalid_signature());
    }
}
