//! Uppercase forwarding to remote peers.
//!
//! # Responsibilities
//! - Build one remote endpoint per configured peer
//! - Spread uppercase calls over the peers in round-robin order
//! - Retry failed calls on the next peer within a deadline
//! - Leave count, and uppercase when no peers are configured, to the inner service
//!
//! ```text
//! uppercase(s)
//!     → Retry (max_time deadline, one attempt per peer)
//!         → RoundRobin → HttpClientEndpoint(peer N) → POST http://<peer>/uppercase
//!     → any failure collapses to ServiceError::ProxyCallFailed
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tower::Layer;
use tracing::Span;

use crate::config::ProxyConfig;
use crate::endpoint::{BoxEndpoint, Endpoint, HttpClientEndpoint, Request, Response, UppercaseRequest};
use crate::load_balancer::{PeerError, PeerSet, RoundRobin};
use crate::resilience::{Backoff, Retry, RetryPolicy};
use crate::service::{ServiceError, StringService};

/// Error type for building the proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyBuildError {
    #[error(transparent)]
    Peer(#[from] PeerError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Layer that wraps a service with [`ProxyingService`].
///
/// The balanced, retried peer endpoint is built once here and shared by
/// every service the layer produces.
#[derive(Clone)]
pub struct ProxyingLayer {
    proxy: Option<BoxEndpoint>,
    span: Span,
}

impl ProxyingLayer {
    /// Build the proxy for `config.peers`. With no peers the layer is a
    /// passthrough. Outbound calls are aborted when `cancel` fires.
    pub fn new(config: &ProxyConfig, cancel: CancellationToken, span: Span) -> Result<Self, ProxyBuildError> {
        let peers = PeerSet::from_addresses(&config.peers);
        if peers.is_empty() {
            tracing::info!(parent: &span, proxy_to = "none");
            return Ok(Self::passthrough(span));
        }

        let urls = peers.uppercase_urls()?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(ProxyBuildError::Client)?;

        let endpoints: Vec<BoxEndpoint> = urls
            .into_iter()
            .map(|url| Arc::new(HttpClientEndpoint::new(client.clone(), url, cancel.clone())) as BoxEndpoint)
            .collect();

        let max_attempts = config
            .max_attempts
            .map_or(endpoints.len(), |cap| cap.clamp(1, endpoints.len()));
        let policy = RetryPolicy {
            max_attempts,
            max_time: Duration::from_millis(config.max_time_ms),
            backoff: Backoff::new(
                Duration::from_millis(config.base_delay_ms),
                Duration::from_millis(config.max_delay_ms),
            ),
        };

        tracing::info!(
            parent: &span,
            proxy_to = %peers,
            max_attempts,
            max_time_ms = config.max_time_ms,
        );

        let balancer = Arc::new(RoundRobin::new(endpoints));
        Ok(Self::from_endpoint(Arc::new(Retry::new(balancer, policy)), span))
    }

    /// Uppercase is always handled by the inner service.
    pub fn passthrough(span: Span) -> Self {
        Self { proxy: None, span }
    }

    /// Forward uppercase to an already assembled endpoint.
    pub fn from_endpoint(endpoint: BoxEndpoint, span: Span) -> Self {
        Self {
            proxy: Some(endpoint),
            span,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.proxy.is_none()
    }
}

impl<S> Layer<S> for ProxyingLayer {
    type Service = ProxyingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ProxyingService {
            inner,
            proxy: self.proxy.clone(),
            span: self.span.clone(),
        }
    }
}

/// Runs uppercase on a remote peer when one is configured.
#[derive(Clone)]
pub struct ProxyingService<S> {
    inner: S,
    proxy: Option<BoxEndpoint>,
    span: Span,
}

impl<S> ProxyingService<S> {
    async fn forward(&self, proxy: &BoxEndpoint, s: &str) -> Result<String, ServiceError> {
        let request = Request::Uppercase(UppercaseRequest { s: s.to_string() });
        match proxy.call(request).await {
            Ok(Response::Uppercase(response)) => match response.err {
                None => Ok(response.v),
                Some(message) => {
                    tracing::warn!(parent: &self.span, error = %message, "Proxy call failed");
                    Err(ServiceError::ProxyCallFailed)
                }
            },
            Ok(other) => {
                tracing::warn!(parent: &self.span, response = other.kind(), "Proxy returned unexpected response");
                Err(ServiceError::ProxyCallFailed)
            }
            Err(e) => {
                tracing::warn!(parent: &self.span, error = %e, "Proxy call failed");
                Err(ServiceError::ProxyCallFailed)
            }
        }
    }
}

#[async_trait]
impl<S> StringService for ProxyingService<S>
where
    S: StringService,
{
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        match &self.proxy {
            Some(proxy) => self.forward(proxy, s).await,
            None => self.inner.uppercase(s).await,
        }
    }

    async fn count(&self, s: &str) -> usize {
        self.inner.count(s).await
    }
}
