//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, limits)
//!     → request.rs (headers + body → InboundRequest)
//!     → relay::handler (verify and forward)
//!     → response.rs (RelayResponse → status + JSON)
//!     → Send to sender
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use headers::{Headers, HEADER_HMAC, HEADER_SHOP_DOMAIN, HEADER_TOPIC};
pub use request::{InboundRequest, X_REQUEST_ID};
pub use response::RelayResponse;
pub use server::HttpServer;
