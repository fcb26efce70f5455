//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, panic recovery)
//!     → middleware/token_auth.rs (rotating token, shipment paths only)
//!     → handlers.rs (health, token, shipment operations, 404)
//!     → forward.rs (carrier URL, subscription key, upstream call)
//!     → response.rs (relay status, headers, body)
//!     → Send to client
//! ```

pub mod error;
pub mod forward;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use error::ProxyError;
pub use forward::Forwarder;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
