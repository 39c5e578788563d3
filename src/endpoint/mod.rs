//! Endpoint subsystem.
//!
//! An endpoint is the uniform `Request -> Result<Response, EndpointError>`
//! shape every operation is reduced to, so transport concerns can wrap any
//! operation without knowing its signature.
//!
//! # Data Flow
//! ```text
//! Inbound:
//!     http server (decode JSON)
//!         → logging.rs (calling / called endpoint)
//!         → adapter.rs (Request → StringService method → Response)
//!
//! Outbound (proxying):
//!     client.rs (Request → POST http://<peer>/uppercase → Response)
//! ```
//!
//! # Design Decisions
//! - Requests and responses are closed enums; a shape mismatch is a routing
//!   bug and surfaces as an error, not a panic
//! - Domain errors travel inside the response, endpoint errors are reserved
//!   for transport and wiring failures
//! - Dropping the call future cancels any in-flight I/O

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub mod adapter;
pub mod client;
pub mod logging;
pub mod types;

pub use adapter::{make_count_endpoint, make_uppercase_endpoint, CountEndpoint, UppercaseEndpoint};
pub use client::HttpClientEndpoint;
pub use logging::{TransportLoggingLayer, TransportLoggingService};
pub use types::{CountRequest, CountResponse, Request, Response, UppercaseRequest, UppercaseResponse};

/// Failures on the endpoint channel.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("{endpoint} endpoint received a {got} request")]
    UnexpectedRequest {
        endpoint: &'static str,
        got: &'static str,
    },

    #[error("expected a {expected} response, got {got}")]
    UnexpectedResponse {
        expected: &'static str,
        got: &'static str,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} reported an error: {message}")]
    Remote { url: String, message: String },

    #[error("no endpoints available")]
    NoEndpoints,

    #[error("all {attempts} attempts failed, last error: {last}")]
    RetriesExhausted {
        attempts: usize,
        last: Box<EndpointError>,
    },

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("cancelled by shutdown")]
    Cancelled,
}

/// A single operation behind a uniform call signature.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn call(&self, request: Request) -> Result<Response, EndpointError>;
}

#[async_trait]
impl<T> Endpoint for Arc<T>
where
    T: Endpoint + ?Sized,
{
    async fn call(&self, request: Request) -> Result<Response, EndpointError> {
        (**self).call(request).await
    }
}

/// Shared, type-erased endpoint.
pub type BoxEndpoint = Arc<dyn Endpoint>;
