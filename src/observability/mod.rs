//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! filter/engine.rs, config/*, http/*:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (decision counters, allow-list gauges)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Rejections logged at info with method, path and referrer
//! - Metric updates are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
