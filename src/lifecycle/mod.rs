//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → metrics registry → service chain → endpoints → HTTP server
//!
//! Shutdown (shutdown.rs):
//!     Signal received → token cancelled → outbound proxy calls abort
//!                                       → server stops accepting and drains
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listeners
//! - Fail fast: any startup error is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_endpoints, build_server, build_service, run, Endpoints, StartupError};
