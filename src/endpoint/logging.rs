//! Call-boundary logging for endpoints.

use async_trait::async_trait;
use tower::Layer;
use tracing::Span;

use crate::endpoint::{Endpoint, EndpointError, Request, Response};

/// Layer that wraps an endpoint with [`TransportLoggingService`].
#[derive(Debug, Clone)]
pub struct TransportLoggingLayer {
    span: Span,
}

impl TransportLoggingLayer {
    /// `span` usually carries the `method` field of the wrapped endpoint.
    pub fn new(span: Span) -> Self {
        Self { span }
    }
}

impl<E> Layer<E> for TransportLoggingLayer {
    type Service = TransportLoggingService<E>;

    fn layer(&self, inner: E) -> Self::Service {
        TransportLoggingService {
            inner,
            span: self.span.clone(),
        }
    }
}

/// Logs "calling endpoint" before and "called endpoint" after every call.
#[derive(Debug, Clone)]
pub struct TransportLoggingService<E> {
    inner: E,
    span: Span,
}

struct Called<'a>(&'a Span);

impl Drop for Called<'_> {
    fn drop(&mut self) {
        tracing::info!(parent: self.0, "called endpoint");
    }
}

#[async_trait]
impl<E> Endpoint for TransportLoggingService<E>
where
    E: Endpoint,
{
    async fn call(&self, request: Request) -> Result<Response, EndpointError> {
        tracing::info!(parent: &self.span, "calling endpoint");
        let _called = Called(&self.span);
        self.inner.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::endpoint::{make_count_endpoint, CountRequest, UppercaseRequest};
    use crate::service::StringCore;

    #[traced_test]
    #[tokio::test]
    async fn test_logs_around_successful_call() {
        let endpoint = TransportLoggingLayer::new(Span::current()).layer(make_count_endpoint(StringCore));

        let response = endpoint.call(Request::Count(CountRequest { s: "abc".into() })).await;
        assert!(response.is_ok());
        assert!(logs_contain("calling endpoint"));
        assert!(logs_contain("called endpoint"));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_called_logged_on_error() {
        let endpoint = TransportLoggingLayer::new(Span::current()).layer(make_count_endpoint(StringCore));

        let response = endpoint
            .call(Request::Uppercase(UppercaseRequest { s: "abc".into() }))
            .await;
        assert!(response.is_err());
        assert!(logs_contain("called endpoint"));
    }
}
