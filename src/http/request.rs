//! Inbound webhook requests.
//!
//! # Responsibilities
//! - Represent one webhook as the trigger layer hands it over
//! - Undo the transport framing to recover the exact signed bytes
//!
//! # Design Decisions
//! - The body stays a string plus a base64 flag, the shape API gateways use
//! - Decoding happens before verification; the sender signed the raw bytes
//! - Binary bodies arriving over plain HTTP are base64-framed on the way in

use axum::body::Bytes;
use axum::http::HeaderMap;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine;
use serde::Deserialize;

use crate::http::headers::Headers;

/// Request ID header set on every inbound request and echoed on responses.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Standard alphabet, padding required, non-zero trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// One inbound webhook, alive for a single invocation.
///
/// Deserializes from an API-gateway style event:
/// `{"headers": {...}, "body": "...", "isBase64Encoded": false}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundRequest {
    #[serde(default)]
    pub headers: Headers,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,

    #[serde(default, rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}

impl InboundRequest {
    pub fn new(headers: Headers, body: impl Into<String>, is_base64_encoded: bool) -> Self {
        Self {
            headers,
            body: body.into(),
            is_base64_encoded,
        }
    }

    /// Build from an HTTP request. UTF-8 bodies pass through as text; anything
    /// else is base64-framed so no byte is lost.
    pub fn from_http(headers: &HeaderMap, body: Bytes) -> Self {
        let headers = Headers::from_header_map(headers);
        match String::from_utf8(body.to_vec()) {
            Ok(text) => Self::new(headers, text, false),
            Err(e) => Self::new(headers, STANDARD.encode(e.as_bytes()), true),
        }
    }

    /// The bytes the sender actually signed.
    ///
    /// Gateways may wrap or pad the framed body, so bytes outside the base64
    /// alphabet (line breaks, spaces) are dropped before decoding.
    pub fn decode_body(&self) -> Result<Vec<u8>, base64::DecodeError> {
        if self.is_base64_encoded {
            let framed: Vec<u8> = self
                .body
                .bytes()
                .filter(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
                .collect();
            LENIENT.decode(framed)
        } else {
            Ok(self.body.as_bytes().to_vec())
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
