//! Request-level errors and their JSON rendering.
//!
//! Every error is terminal for the request that raised it and becomes exactly
//! one HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::routing::{Operation, AVAILABLE_ENDPOINTS};
use crate::security::headers::SUBSCRIPTION_KEY_DISPLAY;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Aipex token required")]
    AuthMissing,

    #[error("Invalid Aipex token")]
    AuthInvalid,

    #[error("Missing {header} header")]
    CredentialMissing { header: &'static str },

    #[error("Target URL not configured for {operation}: set {key}")]
    RouteNotConfigured {
        operation: Operation,
        key: &'static str,
    },

    #[error("Not Found")]
    RouteNotFound,

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    InvalidBody(String),

    #[error("Upstream service error: {message}")]
    UpstreamTransport {
        code: &'static str,
        message: String,
        target_url: String,
    },

    #[error("Carrier API did not respond within {timeout_secs} seconds")]
    UpstreamTimeout {
        timeout_secs: u64,
        target_url: String,
    },

    #[error("Internal server error")]
    InternalFault,
}

impl ProxyError {
    pub fn missing_subscription_key() -> Self {
        ProxyError::CredentialMissing {
            header: SUBSCRIPTION_KEY_DISPLAY,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::AuthMissing | ProxyError::AuthInvalid => StatusCode::UNAUTHORIZED,
            ProxyError::CredentialMissing { .. } | ProxyError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::RouteNotFound => StatusCode::NOT_FOUND,
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::UpstreamTransport { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::RouteNotConfigured { .. } | ProxyError::InternalFault => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> Value {
        match self {
            ProxyError::CredentialMissing { header } => json!({
                "error": self.to_string(),
                "hint": format!("Add header: {}: your-api-key", header),
            }),
            ProxyError::RouteNotConfigured { operation, key } => json!({
                "error": "Target URL not configured",
                "operation": operation.as_str(),
                "key": key,
                "hint": format!("Set {} in the environment or .env file", key),
            }),
            ProxyError::RouteNotFound => json!({
                "error": "Not Found",
                "availableEndpoints": AVAILABLE_ENDPOINTS,
            }),
            ProxyError::PayloadTooLarge { limit } => json!({
                "error": "Payload Too Large",
                "limit": limit,
            }),
            ProxyError::InvalidBody(message) => json!({
                "error": "Invalid request body",
                "message": message,
            }),
            ProxyError::UpstreamTransport {
                code,
                message,
                target_url,
            } => json!({
                "error": "Upstream service error",
                "errorCode": code,
                "errorMessage": message,
                "targetUrl": target_url,
                "hint": "Check if carrier URL is correct and accessible",
            }),
            ProxyError::UpstreamTimeout { target_url, .. } => json!({
                "error": "Gateway Timeout",
                "message": self.to_string(),
                "targetUrl": target_url,
            }),
            ProxyError::AuthMissing | ProxyError::AuthInvalid | ProxyError::InternalFault => {
                json!({ "error": self.to_string() })
            }
        }
    }

    /// Classify a client error and keep its full cause chain.
    pub fn from_upstream(err: &reqwest::Error, target_url: &str) -> Self {
        let code = if err.is_connect() {
            "CONNECT_FAILED"
        } else if err.is_body() {
            "BODY_FAILED"
        } else if err.is_decode() {
            "DECODE_FAILED"
        } else if err.is_request() {
            "REQUEST_FAILED"
        } else {
            "UPSTREAM_ERROR"
        };

        ProxyError::UpstreamTransport {
            code,
            message: error_chain(err),
            target_url: target_url.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ProxyError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_auth_errors() {
        let (status, body) = render(ProxyError::AuthMissing).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Aipex token required");

        let (status, body) = render(ProxyError::AuthInvalid).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid Aipex token");
    }

    #[tokio::test]
    async fn test_missing_credential_names_header() {
        let (status, body) = render(ProxyError::missing_subscription_key()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing Ocp-Apim-Subscription-Key header");
    }

    #[tokio::test]
    async fn test_route_not_configured_names_key() {
        let (status, body) = render(ProxyError::RouteNotConfigured {
            operation: Operation::Label,
            key: Operation::Label.env_key(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["key"], "CARRIER_LABEL_URL");
    }

    #[tokio::test]
    async fn test_timeout_message() {
        let (status, body) = render(ProxyError::UpstreamTimeout {
            timeout_secs: 90,
            target_url: "https://carrier.example/track".into(),
        })
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            body["message"],
            "Carrier API did not respond within 90 seconds"
        );
        assert_eq!(body["targetUrl"], "https://carrier.example/track");
    }

    #[tokio::test]
    async fn test_not_found_lists_endpoints() {
        let (status, body) = render(ProxyError::RouteNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["availableEndpoints"].as_array().unwrap().len(), 4);
    }
}
