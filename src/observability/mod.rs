//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Service and endpoint layers produce:
//!     → logging.rs (structured log events under the process span)
//!     → metrics.rs (counters and summaries)
//!
//! Consumers:
//!     → stderr (human-readable or JSON lines)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Layers receive their span and metric handles at construction
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::{init_tracing, process_span};
pub use metrics::{MetricsRegistry, ServiceMetrics};
