//! Request metrics for the string service.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tower::Layer;

use crate::observability::metrics::{MethodMetrics, ServiceMetrics};
use crate::service::{ServiceError, StringService};

/// Layer that wraps a service with [`InstrumentingService`].
#[derive(Clone)]
pub struct InstrumentingLayer {
    metrics: Arc<ServiceMetrics>,
}

impl InstrumentingLayer {
    pub fn new(metrics: Arc<ServiceMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for InstrumentingLayer {
    type Service = InstrumentingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentingService {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

/// Counts requests and observes latency per method; observes count results.
#[derive(Clone)]
pub struct InstrumentingService<S> {
    inner: S,
    metrics: Arc<ServiceMetrics>,
}

/// Records the call on drop. A call that never completes counts as failed.
struct Observation<'a> {
    metrics: &'a MethodMetrics,
    method: &'static str,
    begin: Instant,
    failed: bool,
}

impl<'a> Observation<'a> {
    fn begin(metrics: &'a MethodMetrics, method: &'static str) -> Self {
        Self {
            metrics,
            method,
            begin: Instant::now(),
            failed: true,
        }
    }
}

impl Drop for Observation<'_> {
    fn drop(&mut self) {
        let took = self.begin.elapsed();
        self.metrics.record(self.failed, took);
        tracing::debug!(method = self.method, failed = self.failed, took = ?took, "request observed");
    }
}

#[async_trait]
impl<S> StringService for InstrumentingService<S>
where
    S: StringService,
{
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        let mut observation = Observation::begin(&self.metrics.uppercase, "uppercase");
        let result = self.inner.uppercase(s).await;
        observation.failed = result.is_err();
        result
    }

    async fn count(&self, s: &str) -> usize {
        let mut observation = Observation::begin(&self.metrics.count, "count");
        let n = self.inner.count(s).await;
        observation.failed = false;
        self.metrics.record_count_result(n);
        n
    }
}
