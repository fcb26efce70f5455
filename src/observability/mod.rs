//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarded shipment calls produce:
//!     → access_log.rs (one structured record per call)
//!     → metrics.rs (counters, histograms)
//! Everything else:
//!     → logging.rs (tracing subscriber, non-blocking stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing, pretty for development
//! - Request ID (x-request-id) flows through the access log
//! - Log delivery is best-effort and never blocks a response

pub mod access_log;
pub mod logging;
pub mod metrics;
