//! Axum router wiring.
//!
//! - `/`, `/health`, `/liveness` : instrumented static JSON endpoints
//! - `/metrics` : exporter, not instrumented

use axum::{http::Method, routing::get, Router};

use beacon_core::error::Result;

use crate::{app_state::AppState, handlers, ops, route::InstrumentedRouter};

pub fn build_router(state: AppState) -> Result<Router> {
    tracing::debug!("building router");
    let router = InstrumentedRouter::new(state.metrics())
        .route("/", "index", Method::GET, handlers::index)?
        .route("/health", "health", Method::GET, handlers::health)?
        .route("/liveness", "liveness", Method::GET, handlers::liveness)?
        .route_uninstrumented("/metrics", get(ops::metrics))?
        .finish();
    tracing::debug!("router built");

    Ok(router.with_state(state))
}
