//! Webhook signature verification.
//!
//! The sender signs the raw request body with HMAC-SHA256 under the shared
//! secret and puts the standard-base64 digest in the signature header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("invalid HMAC key")]
    InvalidKey,
}

/// Compute the base64-encoded HMAC-SHA256 of `payload` keyed by `secret`.
pub fn compute_signature(payload: &[u8], secret: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check `provided` against the digest of `payload` under `secret`.
///
/// The comparison runs in constant time over the encoded digests. Internal
/// failures are logged and reported as a mismatch.
pub fn verify(payload: &[u8], provided: &str, secret: &str) -> bool {
    match compute_signature(payload, secret) {
        Ok(expected) => expected.as_bytes().ct_eq(provided.as_bytes()).into(),
        Err(e) => {
            tracing::error!(error = %e, "Error verifying signature");
            false
        }
    }
}
