//! Startup orchestration.
//!
//! Wires the service chain and the endpoints around it:
//!
//! ```text
//! uppercase/count endpoint
//!     = TransportLogging(Adapter(
//!           Instrumenting(Logging(Proxying(StringCore)))))
//! ```
//!
//! Layers listed first in a `ServiceBuilder` end up outermost.

use std::sync::Arc;

use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tracing::Span;

use crate::config::ServiceConfig;
use crate::endpoint::{make_count_endpoint, make_uppercase_endpoint, BoxEndpoint, TransportLoggingLayer};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::{MetricsRegistry, ServiceMetrics};
use crate::service::{
    InstrumentingLayer, LoggingLayer, ProxyBuildError, ProxyingLayer, SharedService, StringCore,
};

/// Error type for bringing the service up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build proxy: {0}")]
    Proxy(#[from] ProxyBuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// The decorated endpoints served over HTTP.
#[derive(Clone)]
pub struct Endpoints {
    pub uppercase: BoxEndpoint,
    pub count: BoxEndpoint,
}

/// Build the service chain: instrumenting → logging → proxying → core.
///
/// Instrumenting is left out when `metrics` is `None`.
pub fn build_service(
    config: &ServiceConfig,
    metrics: Option<Arc<ServiceMetrics>>,
    shutdown: &Shutdown,
    span: &Span,
) -> Result<SharedService, ProxyBuildError> {
    let proxying = ProxyingLayer::new(&config.proxy, shutdown.token(), span.clone())?;

    let logged = ServiceBuilder::new()
        .layer(LoggingLayer::new(span.clone()))
        .layer(proxying)
        .service(StringCore::new());

    let service: SharedService = match metrics {
        Some(metrics) => Arc::new(InstrumentingLayer::new(metrics).layer(logged)),
        None => Arc::new(logged),
    };
    Ok(service)
}

/// Wrap each service method in an endpoint with call-boundary logging.
pub fn build_endpoints(service: SharedService, span: &Span) -> Endpoints {
    let uppercase = ServiceBuilder::new()
        .layer(TransportLoggingLayer::new(
            tracing::info_span!(parent: span, "endpoint", method = "uppercase"),
        ))
        .service(make_uppercase_endpoint(service.clone()));

    let count = ServiceBuilder::new()
        .layer(TransportLoggingLayer::new(
            tracing::info_span!(parent: span, "endpoint", method = "count"),
        ))
        .service(make_count_endpoint(service));

    Endpoints {
        uppercase: Arc::new(uppercase),
        count: Arc::new(count),
    }
}

/// Assemble the HTTP server for `config`. Service and endpoint logs are
/// emitted under `span`.
pub fn build_server(config: &ServiceConfig, shutdown: &Shutdown, span: &Span) -> Result<HttpServer, StartupError> {
    let metrics = config
        .observability
        .metrics_enabled
        .then(|| MetricsRegistry::new(&config.observability.metrics_namespace));

    let service = build_service(
        config,
        metrics.as_ref().map(MetricsRegistry::service_metrics),
        shutdown,
        span,
    )?;
    let endpoints = build_endpoints(service, span);

    Ok(HttpServer::new(config, endpoints, metrics))
}

/// Bind the configured address and serve until `shutdown` fires.
pub async fn run(config: ServiceConfig, shutdown: Shutdown, span: &Span) -> Result<(), StartupError> {
    let server = build_server(&config, &shutdown, span)?;

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    server.run(listener, shutdown).await.map_err(StartupError::Serve)
}
