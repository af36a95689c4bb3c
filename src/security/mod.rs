//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming webhook:
//!     → signature.rs (HMAC-SHA256 over the decoded body, base64, constant-time compare)
//!     → Pass to relay forwarder only on a match
//! ```
//!
//! # Design Decisions
//! - Fail closed: any internal failure verifies as `false`
//! - No digest or secret material is ever logged

pub mod signature;

pub use signature::{compute_signature, verify, SignatureError};
