//! In-process metrics (Prometheus text exposition).
//!
//! Every instrumented route owns one [`RouteMetrics`] pair (request counter +
//! duration histogram) registered under its label. The registry is an owned
//! object handed to whoever needs it; there is no process-global state.

pub mod registry;
pub mod vec;

pub use registry::{MetricsRegistry, RouteMetrics};
pub use vec::{CounterVec, HistogramVec};
