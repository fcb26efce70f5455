//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → axum Router (exact path match, see http/server.rs)
//!     → Operation (create / track / label)
//!     → CarrierConfig::url_for(operation)
//!     → upstream URL, or RouteNotConfigured
//! ```
//!
//! # Design Decisions
//! - The route table is fixed: three shipment paths, compiled at startup
//! - Upstream targets are keyed by operation, never by free-form path
//! - Explicit 404 listing the served endpoints rather than a silent default

pub mod operation;

pub use operation::{Operation, UnknownOperation, AVAILABLE_ENDPOINTS};
