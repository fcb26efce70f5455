//! Upstream forwarding.
//!
//! # Responsibilities
//! - Resolve the carrier URL for an operation
//! - Require the subscription key before any network activity
//! - Send one outbound request under a deadline
//! - Relay the carrier response (buffered or streaming)
//!
//! # Design Decisions
//! - Redirects are not followed; the carrier's 3xx is relayed as-is
//! - System proxy variables are ignored; the carrier is dialled directly
//! - A single attempt per inbound request
//! - Dropping the returned future drops the outbound call, so a client that
//!   disconnects cancels the upstream request
//! - In streaming mode every body chunk is still read under the call's
//!   deadline; a stalled carrier ends the relayed body with an error

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, Request},
    response::Response,
};
use futures_util::{stream, Stream, StreamExt};

use crate::config::{ProxyConfig, RelayMode};
use crate::http::error::ProxyError;
use crate::http::request::{outbound_body, read_body};
use crate::http::response::relay;
use crate::resilience::Deadline;
use crate::routing::Operation;
use crate::security::headers::{self, SUBSCRIPTION_KEY_DISPLAY, UPSTREAM_USER_AGENT};

/// Forwards shipment calls to the carrier.
pub struct Forwarder {
    client: reqwest::Client,
    config: Arc<ProxyConfig>,
}

impl Forwarder {
    pub fn new(config: Arc<ProxyConfig>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .danger_accept_invalid_certs(config.carrier.accept_invalid_certs)
            .build()?;

        Ok(Self { client, config })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeouts.upstream_secs)
    }

    /// Forward `request` for `operation` and produce the single response
    /// owed to the caller.
    pub async fn forward(
        &self,
        operation: Operation,
        request: Request<Body>,
    ) -> Result<Response, ProxyError> {
        let target_url = self
            .config
            .carrier
            .url_for(operation)
            .ok_or(ProxyError::RouteNotConfigured {
                operation,
                key: operation.env_key(),
            })?;

        let subscription_key: HeaderValue = headers::subscription_key(request.headers())
            .cloned()
            .ok_or_else(ProxyError::missing_subscription_key)?;

        let (parts, body) = request.into_parts();
        let body = outbound_body(read_body(body, self.config.limits.max_body_bytes).await?);

        tracing::debug!(
            operation = %operation,
            target = %target_url,
            body_bytes = body.len(),
            "Forwarding to carrier"
        );

        let outbound = self
            .client
            .request(parts.method, target_url)
            .header(SUBSCRIPTION_KEY_DISPLAY, subscription_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, UPSTREAM_USER_AGENT)
            .body(body);

        let deadline = Deadline::after(self.timeout());
        let upstream = deadline
            .run(outbound.send())
            .await
            .map_err(|_| self.timed_out(target_url))?
            .map_err(|e| ProxyError::from_upstream(&e, target_url))?;

        let status = upstream.status();
        let upstream_headers = upstream.headers().clone();

        let body = match self.config.carrier.relay_mode {
            RelayMode::Buffered => {
                let bytes = deadline
                    .run(upstream.bytes())
                    .await
                    .map_err(|_| self.timed_out(target_url))?
                    .map_err(|e| ProxyError::from_upstream(&e, target_url))?;
                Body::from(bytes)
            }
            RelayMode::Streaming => {
                // Headers are committed from here on; a failure can only
                // truncate the body.
                Body::from_stream(bounded_body(
                    upstream.bytes_stream(),
                    deadline,
                    target_url.to_string(),
                ))
            }
        };

        Ok(relay(status, upstream_headers, body))
    }

    fn timed_out(&self, target_url: &str) -> ProxyError {
        ProxyError::UpstreamTimeout {
            timeout_secs: self.config.timeouts.upstream_secs,
            target_url: target_url.to_string(),
        }
    }
}

/// Relay `upstream` chunk by chunk until it ends, fails, or `deadline`
/// passes. The upstream stream is dropped on the first error.
fn bounded_body<S>(
    upstream: S,
    deadline: Deadline,
    target_url: String,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let state = Some((Box::pin(upstream), deadline, target_url));

    stream::unfold(state, |state| async move {
        let (mut upstream, deadline, target_url) = state?;

        match deadline.run(upstream.next()).await {
            Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some((upstream, deadline, target_url)))),
            Ok(None) => None,
            Ok(Some(Err(e))) => {
                tracing::warn!(target_url = %target_url, error = %e, "Carrier body truncated");
                Some((Err(io::Error::other(e)), None))
            }
            Err(_) => {
                tracing::warn!(
                    target_url = %target_url,
                    timeout_secs = deadline.budget().as_secs(),
                    "Carrier body stalled past the deadline"
                );
                Some((
                    Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "carrier body not received in time",
                    )),
                    None,
                ))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn forwarder(config: ProxyConfig) -> Forwarder {
        Forwarder::new(Arc::new(config)).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_route() {
        let f = forwarder(ProxyConfig::default());
        let request = Request::post("/shipment/create")
            .header("Ocp-Apim-Subscription-Key", "k")
            .body(Body::empty())
            .unwrap();

        let err = f.forward(Operation::Create, request).await.unwrap_err();
        assert!(matches!(
            err,
            ProxyError::RouteNotConfigured { key: "CARRIER_CREATE_URL", .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_key_checked_before_body() {
        let mut config = ProxyConfig::default();
        // Port 9 (discard) is never contacted: the key check fails first
        config.carrier.track_url = Some("http://127.0.0.1:9/track".into());
        config.limits.max_body_bytes = 4;
        let f = forwarder(config);

        let request = Request::post("/shipment/track")
            .body(Body::from("a body longer than the limit"))
            .unwrap();

        let err = f.forward(Operation::Track, request).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let mut config = ProxyConfig::default();
        config.carrier.label_url = Some("http://127.0.0.1:9/label".into());
        config.limits.max_body_bytes = 4;
        let f = forwarder(config);

        let request = Request::post("/shipment/label")
            .header("Ocp-Apim-Subscription-Key", "k")
            .body(Body::from("a body longer than the limit"))
            .unwrap();

        let err = f.forward(Operation::Label, request).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_body_passes_chunks_through() {
        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"ab")),
            Ok(Bytes::from_static(b"cd")),
        ]);
        let out: Vec<_> = bounded_body(chunks, Deadline::after(Duration::from_secs(1)), "t".into())
            .collect()
            .await;

        assert_eq!(out.len(), 2);
        assert_eq!(&out[1].as_ref().unwrap()[..], b"cd");
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_body_ends_on_stall() {
        let stalled = stream::once(async { Ok(Bytes::from_static(b"{\"partial\":")) })
            .chain(stream::pending::<reqwest::Result<Bytes>>());
        let mut body = Box::pin(bounded_body(
            stalled,
            Deadline::after(Duration::from_secs(2)),
            "t".into(),
        ));

        assert!(body.next().await.unwrap().is_ok());
        let err = body.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(body.next().await.is_none());
    }
}
