//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_webhooks_total` (counter): webhooks by terminal outcome
//! - `relay_forward_status_total` (counter): downstream status codes, 502/500 included
//! - `relay_forward_duration_seconds` (histogram): latency of the outbound call

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const WEBHOOKS_TOTAL: &str = "relay_webhooks_total";
pub const FORWARD_STATUS_TOTAL: &str = "relay_forward_status_total";
pub const FORWARD_DURATION_SECONDS: &str = "relay_forward_duration_seconds";

/// Terminal outcome of one webhook, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ConfigError,
    MissingSignature,
    InvalidSignature,
    Forwarded,
    ForwardFailed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::ConfigError => "config_error",
            Outcome::MissingSignature => "missing_signature",
            Outcome::InvalidSignature => "invalid_signature",
            Outcome::Forwarded => "forwarded",
            Outcome::ForwardFailed => "forward_failed",
        }
    }
}

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_webhook(outcome: Outcome) {
    metrics::counter!(WEBHOOKS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_forward(status: u16, started: Instant) {
    metrics::counter!(FORWARD_STATUS_TOTAL, "status" => status.to_string()).increment(1);
    metrics::histogram!(FORWARD_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
}
