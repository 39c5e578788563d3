//! Structured call logging for the string service.
//!
//! One event per call, emitted when the call finishes. The event is written
//! from a guard's `Drop`, so errors, panics and cancelled futures are logged
//! with the elapsed time as well.

use std::time::Instant;

use async_trait::async_trait;
use tower::Layer;
use tracing::Span;

use crate::service::{ServiceError, StringService};

/// Layer that wraps a service with [`LoggingService`].
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    span: Span,
}

impl LoggingLayer {
    /// Events are emitted as children of `span`, which carries the ambient
    /// process fields (e.g. `listen`).
    pub fn new(span: Span) -> Self {
        Self { span }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingService {
            inner,
            span: self.span.clone(),
        }
    }
}

/// Logs method, input, output, error and duration of every call.
#[derive(Debug, Clone)]
pub struct LoggingService<S> {
    inner: S,
    span: Span,
}

enum Outcome {
    Unfinished,
    Uppercase { output: String, err: Option<String> },
    Count(usize),
}

struct CallLog<'a> {
    span: &'a Span,
    method: &'static str,
    input: &'a str,
    begin: Instant,
    outcome: Outcome,
}

impl<'a> CallLog<'a> {
    fn begin(span: &'a Span, method: &'static str, input: &'a str) -> Self {
        Self {
            span,
            method,
            input,
            begin: Instant::now(),
            outcome: Outcome::Unfinished,
        }
    }
}

impl Drop for CallLog<'_> {
    fn drop(&mut self) {
        let took = self.begin.elapsed();
        match &self.outcome {
            Outcome::Uppercase { output, err } => tracing::info!(
                parent: self.span,
                method = self.method,
                input = %self.input,
                output = %output,
                err = err.as_deref().unwrap_or("null"),
                took = ?took,
            ),
            Outcome::Count(n) => tracing::info!(
                parent: self.span,
                method = self.method,
                input = %self.input,
                n = *n,
                err = "null",
                took = ?took,
            ),
            Outcome::Unfinished => tracing::warn!(
                parent: self.span,
                method = self.method,
                input = %self.input,
                took = ?took,
                "call did not complete"
            ),
        }
    }
}

#[async_trait]
impl<S> StringService for LoggingService<S>
where
    S: StringService,
{
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        let mut log = CallLog::begin(&self.span, "uppercase", s);
        let result = self.inner.uppercase(s).await;
        log.outcome = Outcome::Uppercase {
            output: result.as_ref().cloned().unwrap_or_default(),
            err: result.as_ref().err().map(ToString::to_string),
        };
        result
    }

    async fn count(&self, s: &str) -> usize {
        let mut log = CallLog::begin(&self.span, "count", s);
        let n = self.inner.count(s).await;
        log.outcome = Outcome::Count(n);
        n
    }
}
