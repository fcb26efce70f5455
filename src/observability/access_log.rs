//! Per-call access log.
//!
//! One record per forwarded shipment call, emitted on the `access` target.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::http::request::RequestSummary;

/// Structured access log entry.
#[derive(Debug, Serialize)]
pub struct AccessLogEntry {
    pub timestamp: String,
    pub request_id: String,
    pub method: String,
    pub url: String,
    pub operation: &'static str,
    /// Carrier URL the call was (or would have been) sent to.
    pub endpoint: Option<String>,
    pub status: u16,
    pub response_time_ms: u128,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub error: Option<String>,
    pub has_ocp_key: bool,
    pub token_date: Option<String>,
}

impl AccessLogEntry {
    pub fn new(summary: RequestSummary, operation: &'static str, status: u16) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            request_id: summary.request_id,
            method: summary.method,
            url: summary.url,
            operation,
            endpoint: None,
            status,
            response_time_ms: 0,
            client_ip: summary.client_ip,
            user_agent: summary.user_agent,
            error: None,
            has_ocp_key: summary.has_ocp_key,
            token_date: summary.token_date,
        }
    }

    pub fn emit(&self) {
        macro_rules! access_event {
            ($level:ident, $message:literal) => {
                tracing::$level!(
                    target: "access",
                    timestamp = %self.timestamp,
                    request_id = %self.request_id,
                    method = %self.method,
                    url = %self.url,
                    operation = self.operation,
                    endpoint = self.endpoint.as_deref().unwrap_or("-"),
                    status = self.status,
                    response_time_ms = self.response_time_ms as u64,
                    client_ip = self.client_ip.as_deref().unwrap_or("-"),
                    user_agent = self.user_agent.as_deref().unwrap_or("-"),
                    error = self.error.as_deref().unwrap_or("-"),
                    has_ocp_key = self.has_ocp_key,
                    token_date = self.token_date.as_deref().unwrap_or("-"),
                    $message
                )
            };
        }

        if self.status >= 500 {
            access_event!(warn, "Carrier call failed");
        } else {
            access_event!(info, "Carrier call");
        }
    }
}
