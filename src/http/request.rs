//! Inbound request handling.
//!
//! # Responsibilities
//! - Read the inbound body within the configured size limit
//! - Turn it into the outbound carrier body
//! - Capture the request fields the access log needs before the body is
//!   consumed
//!
//! # Design Decisions
//! - Valid JSON is re-serialized compactly; `null`, `{}` and `[]` become an
//!   empty body
//! - Anything that is not JSON is forwarded byte-for-byte

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::ConnectInfo,
    http::{header, Request},
};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::http::error::ProxyError;
use crate::http::middleware::TokenContext;
use crate::security::headers;

/// Header set by `SetRequestIdLayer`.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read the whole inbound body, rejecting bodies over `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, ProxyError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        let source = err.into_inner();
        if source.downcast_ref::<LengthLimitError>().is_some() {
            ProxyError::PayloadTooLarge { limit }
        } else {
            ProxyError::InvalidBody(source.to_string())
        }
    })
}

/// Body to send upstream for a given inbound body.
pub fn outbound_body(inbound: Bytes) -> Bytes {
    if inbound.is_empty() {
        return inbound;
    }

    match serde_json::from_slice::<Value>(&inbound) {
        Ok(Value::Null) => Bytes::new(),
        Ok(Value::Object(map)) if map.is_empty() => Bytes::new(),
        Ok(Value::Array(items)) if items.is_empty() => Bytes::new(),
        Ok(value) => match serde_json::to_vec(&value) {
            Ok(bytes) => Bytes::from(bytes),
            Err(_) => inbound,
        },
        Err(_) => inbound,
    }
}

/// Request fields recorded in the access log.
#[derive(Debug, Clone)]
pub struct RequestSummary {
    pub request_id: String,
    pub method: String,
    pub url: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub has_ocp_key: bool,
    /// Date of the rotating token the request passed, if the gate is on.
    pub token_date: Option<String>,
}

impl RequestSummary {
    pub fn capture(request: &Request<Body>) -> Self {
        let request_headers = request.headers();
        let text = |name: &str| {
            request_headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            request_id: text(X_REQUEST_ID).unwrap_or_else(|| "unknown".to_string()),
            method: request.method().to_string(),
            url: request.uri().to_string(),
            client_ip: request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string()),
            user_agent: text(header::USER_AGENT.as_str()),
            has_ocp_key: headers::subscription_key(request_headers).is_some(),
            token_date: request
                .extensions()
                .get::<TokenContext>()
                .map(|ctx| ctx.date.clone()),
        }
    }
}
