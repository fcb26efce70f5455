//! Endpoint handlers.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::http::error::ProxyError;
use crate::http::request::RequestSummary;
use crate::http::server::AppState;
use crate::observability::{access_log::AccessLogEntry, metrics};
use crate::routing::Operation;
use crate::security::RotatingToken;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since startup.
    pub uptime: f64,
}

#[derive(Serialize)]
pub struct TokenResponse {
    #[serde(flatten)]
    pub token: RotatingToken,
    pub expires: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "Aipex Middleman Active",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

pub async fn generate_token(State(state): State<AppState>) -> Json<TokenResponse> {
    Json(TokenResponse {
        token: RotatingToken::current(&state.config.auth.token_prefix),
        expires: "Midnight UTC",
    })
}

pub async fn not_found() -> ProxyError {
    ProxyError::RouteNotFound
}

pub async fn create_shipment(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward_operation(state, Operation::Create, request).await
}

pub async fn track_shipment(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward_operation(state, Operation::Track, request).await
}

pub async fn label_shipment(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward_operation(state, Operation::Label, request).await
}

/// Forward one call and record its outcome.
async fn forward_operation(state: AppState, operation: Operation, request: Request<Body>) -> Response {
    let start = Instant::now();
    let summary = RequestSummary::capture(&request);

    let result = state.forwarder.forward(operation, request).await;
    let status = match &result {
        Ok(response) => response.status(),
        Err(e) => e.status(),
    };

    metrics::record_request(operation.as_str(), status.as_u16(), start);

    let mut entry = AccessLogEntry::new(summary, operation.as_str(), status.as_u16());
    entry.endpoint = state.config.carrier.url_for(operation).map(str::to_string);
    entry.response_time_ms = start.elapsed().as_millis();
    if let Err(e) = &result {
        entry.error = Some(e.to_string());
    }
    entry.emit();

    match result {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
