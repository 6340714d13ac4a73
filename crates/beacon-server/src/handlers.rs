//! Static JSON endpoints: index, health and liveness.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::Response,
};

use crate::app_state::AppState;
use crate::respond::respond_json;

pub const INDEX_MESSAGE: &str = "Hello from rust api server";

/// `GET /` : greeting plus application name/version from config.
pub async fn index(State(state): State<AppState>, method: Method) -> Response {
    tracing::debug!("entering index(/)");
    tracing::info!("processing request on index(/)");
    let cfg = state.cfg();
    let msg = BTreeMap::from([
        ("message", INDEX_MESSAGE),
        ("application", cfg.app_name.as_str()),
        ("version", cfg.app_version.as_str()),
    ]);
    let res = respond_json(&method, StatusCode::OK, &msg);
    tracing::debug!("exiting index(/)");
    res
}

/// `GET /health`
pub async fn health(method: Method) -> Response {
    tracing::debug!("entering health");
    tracing::info!("processing request on health(/health)");
    let res = respond_json(&method, StatusCode::OK, &BTreeMap::from([("health", "OK")]));
    tracing::debug!("exiting health");
    res
}

/// `GET /liveness`
pub async fn liveness(method: Method) -> Response {
    tracing::debug!("entering liveness");
    tracing::info!("processing request on liveness(/liveness)");
    let res = respond_json(&method, StatusCode::OK, &BTreeMap::from([("status", "UP")]));
    tracing::debug!("exiting liveness");
    res
}
