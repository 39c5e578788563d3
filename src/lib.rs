//! String service library.
//!
//! Two operations (uppercase and count) behind a chain of service
//! decorators, exposed as endpoints over HTTP/JSON.

pub mod config;
pub mod endpoint;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resilience;
pub mod service;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::{ServiceError, SharedService, StringService};
