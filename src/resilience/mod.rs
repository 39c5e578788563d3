//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Proxied call:
//!     → retries.rs (overall deadline, one attempt per peer)
//!     → load balancer picks the next peer endpoint
//!     → On failure: backoff.rs (jittered delay), then next peer
//! ```
//!
//! # Design Decisions
//! - Every proxied call has a deadline covering all attempts
//! - Attempts are sequential, never fanned out
//! - Shutdown cancellation is not retried

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{Retry, RetryPolicy};
