//! Aipex Middleman: a thin reverse proxy in front of a carrier shipment API.
//!
//! Shipment calls (create, track, label) are gated by a rotating daily token,
//! forwarded to the configured carrier URL with the caller's subscription key,
//! and the carrier's response is relayed back unchanged.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
