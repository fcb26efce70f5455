//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming shipment request:
//!     → headers.rs (locate token and subscription key)
//!     → token.rs (compare against today's rotating token)
//!     → http/middleware/token_auth.rs (reject or pass to forwarder)
//! ```
//!
//! # Design Decisions
//! - Fail closed: missing or mismatched token is rejected before forwarding
//! - The rotating token is not a credential; the subscription key is only
//!   passed through, never validated locally

pub mod headers;
pub mod token;

pub use token::RotatingToken;
