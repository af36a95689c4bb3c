//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Webhook handling produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for log aggregation)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID from the HTTP layer is attached to every webhook span
//! - Secrets, API keys and digests never appear in events or labels
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
