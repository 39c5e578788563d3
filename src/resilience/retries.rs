//! Bounded retry over a load balancer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::endpoint::{Endpoint, EndpointError, Request, Response};
use crate::load_balancer::LoadBalancer;
use crate::resilience::Backoff;

/// Limits for one retried call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included. Clamped to 1..=endpoint count,
    /// so no endpoint is tried twice in one call.
    pub max_attempts: usize,
    /// Deadline for all attempts and backoff sleeps together.
    pub max_time: Duration,
    pub backoff: Backoff,
}

/// Endpoint that retries failed calls on the balancer's next endpoint.
#[derive(Debug, Clone)]
pub struct Retry {
    balancer: Arc<dyn LoadBalancer>,
    policy: RetryPolicy,
}

impl Retry {
    pub fn new(balancer: Arc<dyn LoadBalancer>, policy: RetryPolicy) -> Self {
        Self { balancer, policy }
    }

    async fn attempt_all(&self, request: Request) -> Result<Response, EndpointError> {
        let order = self.balancer.attempt_order()?;
        let max_attempts = self.policy.max_attempts.clamp(1, order.len().max(1));
        let mut last = EndpointError::NoEndpoints;

        for (index, endpoint) in order.iter().take(max_attempts).enumerate() {
            let attempt = index + 1;
            if attempt > 1 {
                let delay = self.policy.backoff.delay(index as u32);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            match endpoint.call(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(EndpointError::Cancelled) => return Err(EndpointError::Cancelled),
                Err(e) => {
                    tracing::debug!(attempt, max_attempts, error = %e, "Endpoint attempt failed");
                    last = e;
                }
            }
        }

        Err(EndpointError::RetriesExhausted {
            attempts: max_attempts,
            last: Box::new(last),
        })
    }
}

#[async_trait]
impl Endpoint for Retry {
    async fn call(&self, request: Request) -> Result<Response, EndpointError> {
        let max_time = self.policy.max_time;
        match tokio::time::timeout(max_time, self.attempt_all(request)).await {
            Ok(result) => result,
            Err(_) => Err(EndpointError::DeadlineExceeded(max_time)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::endpoint::{BoxEndpoint, UppercaseRequest, UppercaseResponse};
    use crate::load_balancer::RoundRobin;

    /// Fails or succeeds as configured, counting calls.
    struct Scripted {
        fail: bool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(fail: bool) -> Arc<Self> {
            Self::slow(fail, Duration::ZERO)
        }

        fn slow(fail: bool, delay: Duration) -> Arc<Self> {
            Arc::new(Self { fail, delay, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl Endpoint for Scripted {
        async fn call(&self, _request: Request) -> Result<Response, EndpointError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(EndpointError::Remote { url: "test".into(), message: "down".into() })
            } else {
                Ok(Response::Uppercase(UppercaseResponse { v: "OK".into(), err: None }))
            }
        }
    }

    fn retry(endpoints: Vec<BoxEndpoint>, max_time: Duration) -> Retry {
        let max_attempts = endpoints.len();
        Retry::new(
            Arc::new(RoundRobin::new(endpoints)),
            RetryPolicy { max_attempts, max_time, backoff: Backoff::none() },
        )
    }

    fn request() -> Request {
        Request::Uppercase(UppercaseRequest { s: "ok".into() })
    }

    #[tokio::test]
    async fn test_retries_next_peer() {
        let bad = Scripted::new(true);
        let good = Scripted::new(false);
        let retry = retry(vec![bad.clone() as BoxEndpoint, good.clone()], Duration::from_secs(1));

        assert!(retry.call(request()).await.is_ok());
        assert_eq!(bad.calls.load(Ordering::SeqCst), 1);
        assert_eq!(good.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_each_peer_tried_once() {
        let peers: Vec<_> = (0..3).map(|_| Scripted::new(true)).collect();
        let retry = retry(peers.iter().map(|p| p.clone() as BoxEndpoint).collect(), Duration::from_secs(1));

        let err = retry.call(request()).await.unwrap_err();
        assert!(matches!(err, EndpointError::RetriesExhausted { attempts: 3, .. }));
        for peer in &peers {
            assert_eq!(peer.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_concurrent_calls_retry_on_their_own_next_peer() {
        let bad = Scripted::slow(true, Duration::from_millis(50));
        let good = Scripted::new(false);
        let retry = retry(vec![bad.clone() as BoxEndpoint, good.clone()], Duration::from_secs(1));

        // The first call fails slowly on `bad` while the second starts on
        // `good`; the first call's retry still goes to `good`.
        let (first, second) = tokio::join!(retry.call(request()), retry.call(request()));
        assert!(first.is_ok(), "first call: {first:?}");
        assert!(second.is_ok(), "second call: {second:?}");
        assert_eq!(bad.calls.load(Ordering::SeqCst), 1);
        assert_eq!(good.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_attempts_capped_at_endpoint_count() {
        let peers: Vec<_> = (0..2).map(|_| Scripted::new(true)).collect();
        let retry = Retry::new(
            Arc::new(RoundRobin::new(peers.iter().map(|p| p.clone() as BoxEndpoint).collect())),
            RetryPolicy { max_attempts: 5, max_time: Duration::from_secs(1), backoff: Backoff::none() },
        );

        let err = retry.call(request()).await.unwrap_err();
        assert!(matches!(err, EndpointError::RetriesExhausted { attempts: 2, .. }));
        for peer in &peers {
            assert_eq!(peer.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bounds_slow_peers() {
        let slow = Scripted::slow(false, Duration::from_secs(10));
        let retry = retry(vec![slow as BoxEndpoint], Duration::from_millis(250));

        let err = retry.call(request()).await.unwrap_err();
        assert!(matches!(err, EndpointError::DeadlineExceeded(d) if d == Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_no_endpoints() {
        let retry = retry(Vec::new(), Duration::from_secs(1));
        assert!(matches!(retry.call(request()).await, Err(EndpointError::NoEndpoints)));
    }
}
