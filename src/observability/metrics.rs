//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Count locale resolutions, failures and URL rewrites
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `locale_resolutions_total` (counter): resolutions by winning strategy
//! - `locale_resolution_failures_total` (counter): failures by reason
//! - `url_rewrites_total` (counter): rewrites by direction
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Label values are static strings

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// A locale was resolved by `strategy`.
pub fn record_resolution(strategy: &'static str) {
    metrics::counter!("locale_resolutions_total", "strategy" => strategy).increment(1);
}

/// Resolution failed; `reason` is e.g. `"invalid_locale"` or `"no_locale"`.
pub fn record_resolution_failure(reason: &'static str) {
    metrics::counter!("locale_resolution_failures_total", "reason" => reason).increment(1);
}

/// A URL was rewritten in `direction` (`"localize"` or `"delocalize"`).
pub fn record_rewrite(direction: &'static str) {
    metrics::counter!("url_rewrites_total", "direction" => direction).increment(1);
}
