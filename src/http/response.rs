//! Responses handed back to the webhook sender.
//!
//! # Responsibilities
//! - One constructor per terminal state of webhook handling
//! - Render as JSON with the matching status code
//!
//! # Design Decisions
//! - Downstream failures still answer 200; the sender's retry policy only
//!   looks at our status, and the payload was already authenticated
//! - Bodies are fixed JSON shapes so senders and dashboards can parse them

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub const MSG_FORWARDED: &str = "Webhook processed successfully";
pub const MSG_FORWARD_FAILED: &str = "Webhook received but forwarding failed";

/// Status and JSON body for one webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RelayResponse {
    pub fn configuration_error() -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, "Configuration error")
    }

    pub fn missing_signature() -> Self {
        Self::error(StatusCode::UNAUTHORIZED, "Missing signature header")
    }

    pub fn invalid_signature() -> Self {
        Self::error(StatusCode::UNAUTHORIZED, "Invalid signature")
    }

    /// The downstream API accepted the payload.
    pub fn forwarded(maistro_status: u16) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({
                "message": MSG_FORWARDED,
                "maistro_status": maistro_status,
            }),
        }
    }

    /// The payload was authentic but the downstream API did not accept it.
    pub fn forward_failed(maistro_status: u16, error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({
                "message": MSG_FORWARD_FAILED,
                "maistro_status": maistro_status,
                "error": error.into(),
            }),
        }
    }

    fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
