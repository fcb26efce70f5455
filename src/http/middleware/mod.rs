pub mod token_auth;

pub use token_auth::{token_auth_middleware, TokenContext};
