//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Resolution and rewriting produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; binaries install subscribers
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
