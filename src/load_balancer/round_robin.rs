//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::endpoint::{BoxEndpoint, EndpointError};
use crate::load_balancer::LoadBalancer;

/// Round-robin selector.
/// Stores an internal counter to rotate through endpoints.
pub struct RoundRobin {
    endpoints: Vec<BoxEndpoint>,
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new(endpoints: Vec<BoxEndpoint>) -> Self {
        Self {
            endpoints,
            counter: AtomicUsize::new(0),
        }
    }

    fn next_index(&self) -> Option<usize> {
        if self.endpoints.is_empty() {
            return None;
        }
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        Some(count % self.endpoints.len())
    }
}

impl LoadBalancer for RoundRobin {
    fn attempt_order(&self) -> Result<Vec<BoxEndpoint>, EndpointError> {
        let start = self.next_index().ok_or(EndpointError::NoEndpoints)?;
        let len = self.endpoints.len();

        Ok((0..len)
            .map(|i| self.endpoints[(start + i) % len].clone())
            .collect())
    }
}

impl std::fmt::Debug for RoundRobin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundRobin")
            .field("endpoints", &self.endpoints.len())
            .field("counter", &self.counter.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::endpoint::{Endpoint, Request, Response, UppercaseRequest, UppercaseResponse};

    /// Answers with its own name so the selection order is observable.
    struct Named(&'static str);

    #[async_trait]
    impl Endpoint for Named {
        async fn call(&self, _request: Request) -> Result<Response, EndpointError> {
            Ok(Response::Uppercase(UppercaseResponse { v: self.0.into(), err: None }))
        }
    }

    async fn name_of(endpoint: &BoxEndpoint) -> String {
        match endpoint
            .call(Request::Uppercase(UppercaseRequest { s: String::new() }))
            .await
            .unwrap()
        {
            Response::Uppercase(r) => r.v,
            other => panic!("unexpected response {other:?}"),
        }
    }

    async fn pick(lb: &RoundRobin) -> String {
        name_of(&lb.attempt_order().unwrap()[0]).await
    }

    fn abc() -> RoundRobin {
        RoundRobin::new(vec![
            Arc::new(Named("a")) as BoxEndpoint,
            Arc::new(Named("b")),
            Arc::new(Named("c")),
        ])
    }

    #[tokio::test]
    async fn test_round_robin() {
        let lb = abc();

        let mut order = Vec::new();
        for _ in 0..5 {
            order.push(pick(&lb).await);
        }
        assert_eq!(order, ["a", "b", "c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_attempt_order_wraps_from_start() {
        let lb = abc();
        lb.attempt_order().unwrap();

        let mut order = Vec::new();
        for endpoint in &lb.attempt_order().unwrap() {
            order.push(name_of(endpoint).await);
        }
        assert_eq!(order, ["b", "c", "a"]);

        // Walking the order does not move the cursor.
        assert_eq!(pick(&lb).await, "c");
    }

    #[test]
    fn test_empty_has_no_endpoints() {
        let lb = RoundRobin::new(Vec::new());
        assert!(matches!(lb.attempt_order(), Err(EndpointError::NoEndpoints)));
    }

    #[test]
    fn test_concurrent_selection_is_even() {
        let lb = Arc::new(RoundRobin::new(vec![
            Arc::new(Named("a")) as BoxEndpoint,
            Arc::new(Named("b")),
        ]));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lb = lb.clone();
                std::thread::spawn(move || {
                    (0..250).map(|_| lb.next_index().unwrap()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut hits = [0usize; 2];
        for handle in handles {
            for index in handle.join().unwrap() {
                hits[index] += 1;
            }
        }
        assert_eq!(hits, [500, 500]);
    }
}
