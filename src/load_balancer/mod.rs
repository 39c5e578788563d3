//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! proxy peer list ("host:port,host:port")
//!     → peers.rs (parse into an ordered PeerSet, build peer URLs)
//!     → one remote endpoint per peer
//!     → round_robin.rs (rotate through the endpoints)
//!     → resilience::retries (retry the next endpoint on failure)
//! ```
//!
//! # Design Decisions
//! - Selection order is the configuration order, starting at the first peer
//! - The cursor is a single atomic counter shared by all requests
//! - One cursor step per call; retries walk on from the call's own start
//! - No health-based exclusion; a failing peer is skipped only by retries

use crate::endpoint::{BoxEndpoint, EndpointError};

pub mod peers;
pub mod round_robin;

pub use peers::{PeerError, PeerSet};
pub use round_robin::RoundRobin;

/// Picks the endpoints for one call.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Every endpoint once, in the order the call should try them. The
    /// first entry is this call's pick; the rest are its retry targets.
    fn attempt_order(&self) -> Result<Vec<BoxEndpoint>, EndpointError>;
}
