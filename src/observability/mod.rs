//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! guard, store, http
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout log lines
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Subject ids are logged as a structured field, never interpolated
//! - Metric helpers are no-ops until a recorder is installed, so library
//!   users and tests pay nothing

pub mod logging;
pub mod metrics;
