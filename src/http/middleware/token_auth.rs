//! Rotating token gate for shipment endpoints.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ProxyError;
use crate::http::server::AppState;
use crate::security::{headers, RotatingToken};

/// Token fields attached to requests that passed the gate.
#[derive(Clone, Debug)]
pub struct TokenContext {
    pub date: String,
    pub day: &'static str,
}

pub async fn token_auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // 1. Gate disabled: passthrough mode
    if !state.config.auth.enabled {
        return next.run(req).await;
    }

    // 2. Extract the presented token
    let presented = match headers::presented_token(req.headers()) {
        Some(token) => token,
        None => return ProxyError::AuthMissing.into_response(),
    };

    // 3. Compare against today's token
    let expected = RotatingToken::current(&state.config.auth.token_prefix);
    if !expected.matches(&presented) {
        tracing::debug!(day = expected.day, "Rejected rotating token");
        return ProxyError::AuthInvalid.into_response();
    }

    req.extensions_mut().insert(TokenContext {
        date: expected.date,
        day: expected.day,
    });
    next.run(req).await
}
