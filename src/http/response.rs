//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the carrier's status, headers and body to the caller
//! - Drop hop-by-hop headers; the server re-frames the body itself
//!
//! # Design Decisions
//! - Status and end-to-end headers are copied unchanged
//! - Body bytes are never inspected or rewritten

use axum::{
    body::Body,
    http::{HeaderMap, StatusCode},
    response::Response,
};

use crate::security::headers::strip_hop_by_hop;

/// Build the caller-facing response from an upstream status, headers and body.
pub fn relay(status: StatusCode, mut headers: HeaderMap, body: Body) -> Response {
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
