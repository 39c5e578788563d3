//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use stringsvc::config::ServiceConfig;
use stringsvc::endpoint::UppercaseRequest;
use stringsvc::lifecycle::{build_server, Shutdown};
use stringsvc::observability::process_span;

/// A running service instance.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config listening on an ephemeral loopback port.
pub fn test_config(namespace: &str, peers: &[SocketAddr]) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.observability.metrics_namespace = namespace.into();
    config.proxy.peers = peers.iter().map(SocketAddr::to_string).collect();
    config.proxy.max_time_ms = 2_000;
    config
}

/// Start a service for `config` on its own listener.
pub async fn start_service(config: ServiceConfig) -> TestService {
    let shutdown = Shutdown::new();
    let span = process_span(&config.listener.bind_address);
    let server = build_server(&config, &shutdown, &span).unwrap();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let run_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, run_shutdown).await;
    });

    TestService { addr, shutdown }
}

/// Start a programmable uppercase peer. `f` maps the input string to a
/// status and JSON body.
pub async fn start_programmable_peer<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, Value)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    let router = Router::new().route(
        "/uppercase",
        post(move |Json(req): Json<UppercaseRequest>| {
            let f = f.clone();
            async move {
                let (status, body) = f(req.s).await;
                (StatusCode::from_u16(status).unwrap(), Json(body))
            }
        }),
    );

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// POST a JSON body and return the status and decoded response.
pub async fn post_json(url: &str, body: Value) -> (StatusCode, Value) {
    let res = reqwest::Client::new().post(url).json(&body).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

pub async fn get_text(url: &str) -> (StatusCode, String) {
    let res = reqwest::get(url).await.unwrap();
    let status = res.status();
    (status, res.text().await.unwrap())
}
