//! Observability wiring.
//!
//! Metrics live in `beacon_core::metrics`; this module only sets up logging.

pub mod logging;
