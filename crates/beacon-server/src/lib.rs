//! beacon server library entry.
//!
//! Wires configuration, logging, the JSON responder, the instrumented router
//! and the metrics exporter into one HTTP service. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod respond;
pub mod route;
pub mod router;
pub mod server;
