//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Decode request bodies, invoke endpoints, encode responses
//! - Serve `/metrics` when metrics are enabled

use std::time::Duration;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::endpoint::{
    CountRequest, CountResponse, Endpoint, EndpointError, Request, Response, UppercaseRequest,
    UppercaseResponse,
};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::HttpError;
use crate::lifecycle::{Endpoints, Shutdown};
use crate::observability::MetricsRegistry;

/// HTTP server for the string service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `endpoints`.
    pub fn new(config: &ServiceConfig, endpoints: Endpoints, metrics: Option<MetricsRegistry>) -> Self {
        Self {
            router: Self::build_router(config, endpoints, metrics),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, endpoints: Endpoints, metrics: Option<MetricsRegistry>) -> Router {
        let mut router = Router::new()
            .route("/uppercase", post(uppercase_handler))
            .route("/count", post(count_handler))
            .route("/health", get(|| async { "ok" }));

        if let Some(registry) = metrics {
            router = router.route(
                "/metrics",
                get(move || {
                    let registry = registry.clone();
                    async move { registry.render() }
                }),
            );
        }

        router.with_state(endpoints).layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// The router, for serving on a custom listener or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn uppercase_handler(
    State(endpoints): State<Endpoints>,
    Json(request): Json<UppercaseRequest>,
) -> Result<Json<UppercaseResponse>, HttpError> {
    match endpoints.uppercase.call(Request::Uppercase(request)).await? {
        Response::Uppercase(response) => Ok(Json(response)),
        other => Err(EndpointError::UnexpectedResponse {
            expected: "uppercase",
            got: other.kind(),
        }
        .into()),
    }
}

async fn count_handler(
    State(endpoints): State<Endpoints>,
    Json(request): Json<CountRequest>,
) -> Result<Json<CountResponse>, HttpError> {
    match endpoints.count.call(Request::Count(request)).await? {
        Response::Count(response) => Ok(Json(response)),
        other => Err(EndpointError::UnexpectedResponse {
            expected: "count",
            got: other.kind(),
        }
        .into()),
    }
}
