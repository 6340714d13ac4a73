//! Route table with per-route request instrumentation.

pub mod instrumented;

pub use instrumented::InstrumentedRouter;
