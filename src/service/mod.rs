//! String service subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint adapter
//!     → instrumenting.rs (request count, latency, count result)
//!     → logging.rs (one structured line per call)
//!     → proxying.rs (uppercase forwarded to a peer when peers are configured)
//!     → core_service.rs (the actual string operations)
//! ```
//!
//! # Design Decisions
//! - Every decorator implements [`StringService`] and wraps an inner one
//! - Decorators are `tower::Layer`s, so chains read top-down in a `ServiceBuilder`
//! - Wrap order changes side-effect order, never the result
//! - Count is never altered by a decorator; only uppercase may be intercepted

use std::sync::Arc;

use async_trait::async_trait;

pub mod core_service;
pub mod instrumenting;
pub mod logging;
pub mod proxying;

pub use core_service::StringCore;
pub use instrumenting::{InstrumentingLayer, InstrumentingService};
pub use logging::{LoggingLayer, LoggingService};
pub use proxying::{ProxyBuildError, ProxyingLayer, ProxyingService};

/// Errors returned by the uppercase operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Forwarding to the configured peers failed. The cause is logged by the
    /// proxying layer, not returned.
    #[error("proxy call failed")]
    ProxyCallFailed,
}

/// The two domain operations over a string.
#[async_trait]
pub trait StringService: Send + Sync {
    /// Upper-case `s`.
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError>;

    /// Number of bytes in `s`. Never fails.
    async fn count(&self, s: &str) -> usize;
}

#[async_trait]
impl<T> StringService for Arc<T>
where
    T: StringService + ?Sized,
{
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        (**self).uppercase(s).await
    }

    async fn count(&self, s: &str) -> usize {
        (**self).count(s).await
    }
}

/// Shared, type-erased service chain.
pub type SharedService = Arc<dyn StringService>;
