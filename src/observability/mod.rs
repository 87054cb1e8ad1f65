//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Account fetches produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms via the metrics facade)
//!
//! Consumers:
//!     → stdout (fmt subscriber installed by the CLI)
//!     → any metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a global subscriber or recorder itself
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
