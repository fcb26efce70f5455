//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panic recovery, token gate)
//! - Bind server to listener
//! - Dispatch shipment calls to the forwarder

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    handler::Handler,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::error::ProxyError;
use crate::http::forward::Forwarder;
use crate::http::handlers::{
    create_shipment, generate_token, health, label_shipment, not_found, track_shipment,
};
use crate::http::middleware::token_auth_middleware;
use crate::routing::Operation;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub forwarder: Arc<Forwarder>,
    pub started_at: Instant,
}

/// HTTP server for the middleman.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);
        let forwarder = Arc::new(Forwarder::new(config.clone())?);

        let state = AppState {
            config: config.clone(),
            forwarder,
            started_at: Instant::now(),
        };

        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth_enabled = self.config.auth.enabled,
            relay_mode = ?self.config.carrier.relay_mode,
            "HTTP server starting"
        );

        for operation in Operation::ALL {
            match self.config.carrier.url_for(operation) {
                Some(url) => tracing::info!(path = operation.path(), target = url, "Route ready"),
                None => tracing::warn!(
                    path = operation.path(),
                    key = operation.env_key(),
                    "Route has no carrier URL; calls will fail with 500"
                ),
            }
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Known paths called with the wrong method fall through to the 404 handler.
pub fn build_router(state: AppState) -> Router {
    let token_gate = middleware::from_fn_with_state(state.clone(), token_auth_middleware);

    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/generate-token", get(generate_token).fallback(not_found))
        .route(
            Operation::Create.path(),
            post(create_shipment.layer(token_gate.clone())).fallback(not_found),
        )
        .route(
            Operation::Track.path(),
            post(track_shipment.layer(token_gate.clone())).fallback(not_found),
        )
        .route(
            Operation::Label.path(),
            post(label_shipment.layer(token_gate)).fallback(not_found),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };

    tracing::error!(panic = detail, "Handler panicked");
    ProxyError::InternalFault.into_response()
}
