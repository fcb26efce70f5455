//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to carrier:
//!     → timeouts.rs (one deadline per upstream call)
//!     → On expiry: drop the call, answer 504
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - Exactly one upstream attempt per inbound request: no retries, no
//!   circuit breaking

pub mod timeouts;

pub use timeouts::Deadline;
