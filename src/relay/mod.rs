//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → handler.rs (config check, signature header, body decoding)
//!     → security::signature (HMAC verification)
//!     → forwarder.rs (single POST to the automation API)
//!     → handler.rs (map downstream outcome to RelayResponse)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives a webhook besides metrics
//! - Authentication failures stop before any network I/O
//! - Downstream failures are absorbed into a 200 response

pub mod forwarder;
pub mod handler;

pub use forwarder::{ForwardError, ForwardOutcome, Forwarder};
pub use handler::handle;
