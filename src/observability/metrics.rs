//! Metrics collection and exposition.
//!
//! # Metrics
//! - `<ns>_request_count` (counter): requests by `method`, `error`
//! - `<ns>_request_latency_microseconds` (summary): latency by `method`, `error`
//! - `<ns>_count_result` (summary): distribution of count results
//!
//! Handles are registered once against a locally built Prometheus recorder
//! and handed to the instrumenting layer. Nothing is installed globally, so
//! several services can live in one process (tests do this).

use std::sync::Arc;
use std::time::Duration;

use metrics::{Counter, Histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Metric namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "string_service";

/// Request metrics for one service method.
#[derive(Clone)]
pub struct MethodMetrics {
    requests_ok: Counter,
    requests_failed: Counter,
    latency_ok: Histogram,
    latency_failed: Histogram,
}

impl MethodMetrics {
    fn register(namespace: &str, method: &'static str) -> Self {
        let count_name = format!("{namespace}_request_count");
        let latency_name = format!("{namespace}_request_latency_microseconds");
        Self {
            requests_ok: metrics::counter!(count_name.clone(), "method" => method, "error" => "false"),
            requests_failed: metrics::counter!(count_name, "method" => method, "error" => "true"),
            latency_ok: metrics::histogram!(latency_name.clone(), "method" => method, "error" => "false"),
            latency_failed: metrics::histogram!(latency_name, "method" => method, "error" => "true"),
        }
    }

    /// Record one finished call.
    pub fn record(&self, failed: bool, took: Duration) {
        let micros = took.as_secs_f64() * 1_000_000.0;
        if failed {
            self.requests_failed.increment(1);
            self.latency_failed.record(micros);
        } else {
            self.requests_ok.increment(1);
            self.latency_ok.record(micros);
        }
    }
}

/// All metric handles used by the instrumenting layer.
#[derive(Clone)]
pub struct ServiceMetrics {
    pub uppercase: MethodMetrics,
    pub count: MethodMetrics,
    count_result: Histogram,
}

impl ServiceMetrics {
    /// Register handles against the recorder active on this thread.
    pub fn register(namespace: &str) -> Self {
        metrics::describe_counter!(
            format!("{namespace}_request_count"),
            "Number of requests received."
        );
        metrics::describe_histogram!(
            format!("{namespace}_request_latency_microseconds"),
            metrics::Unit::Microseconds,
            "Total duration of requests in microseconds."
        );
        metrics::describe_histogram!(
            format!("{namespace}_count_result"),
            "The result of each count method."
        );

        Self {
            uppercase: MethodMetrics::register(namespace, "uppercase"),
            count: MethodMetrics::register(namespace, "count"),
            count_result: metrics::histogram!(format!("{namespace}_count_result")),
        }
    }

    pub fn record_count_result(&self, n: usize) {
        self.count_result.record(n as f64);
    }
}

/// Process metrics registry: the Prometheus handle plus service handles.
#[derive(Clone)]
pub struct MetricsRegistry {
    handle: PrometheusHandle,
    service: Arc<ServiceMetrics>,
}

impl MetricsRegistry {
    /// Build a Prometheus recorder and register the service metrics on it.
    pub fn new(namespace: &str) -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let service = metrics::with_local_recorder(&recorder, || ServiceMetrics::register(namespace));

        tracing::debug!(namespace, "Metrics registry initialized");

        Self {
            handle,
            service: Arc::new(service),
        }
    }

    /// Handles for the instrumenting layer.
    pub fn service_metrics(&self) -> Arc<ServiceMetrics> {
        self.service.clone()
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry").finish_non_exhaustive()
    }
}
