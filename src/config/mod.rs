//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults or config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (PORT, CARRIER_*_URL, ... environment overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc with the forwarder and handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is fixed for the
//!   process lifetime
//! - All fields have defaults to allow an environment-only deployment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, CarrierConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ProxyConfig, RelayMode, TimeoutConfig,
};
