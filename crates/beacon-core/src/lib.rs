//! beacon core: the shared error surface and the in-process metrics registry.
//!
//! This crate knows nothing about HTTP or async runtimes. The server crate
//! feeds it status codes, methods and elapsed durations; the registry keeps
//! the per-route counters/histograms and renders them in the Prometheus text
//! exposition format.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as `BeaconError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{BeaconError, Result};
pub use metrics::{MetricsRegistry, RouteMetrics};
