//! Instrumented route registration.
//!
//! `InstrumentedRouter::route` binds `(path, method)` to a handler and gives
//! the route its own metric pair in the registry. The handler is wrapped by a
//! per-route middleware that times the call and records `(code, method)` once
//! the response exists, so handlers never see the instrumentation.
//!
//! Every instrumented route also answers OPTIONS (CORS preflight); those
//! requests go through the same wrapper and are counted like any other.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    handler::Handler,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use futures_util::FutureExt;

use beacon_core::error::{BeaconError, Result};
use beacon_core::{MetricsRegistry, RouteMetrics};

use crate::app_state::AppState;

pub struct InstrumentedRouter {
    router: Router<AppState>,
    registry: Arc<MetricsRegistry>,
    paths: Vec<String>,
}

impl InstrumentedRouter {
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        Self {
            router: Router::new(),
            registry,
            paths: Vec::new(),
        }
    }

    /// Register `handler` under `(path, method)` with request counting and
    /// timing under `label`.
    ///
    /// Fails if the path is malformed or taken, the method is not routable,
    /// or `label` is invalid or already registered.
    pub fn route<H, T>(mut self, path: &str, label: &str, method: Method, handler: H) -> Result<Self>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.claim_path(path)?;
        let filter = MethodFilter::try_from(method.clone()).map_err(|_| {
            BeaconError::InvalidRoute(format!("method {method} is not routable ({path})"))
        })?;
        let allow = allow_methods(&method)?;
        let accepted = method.clone();

        tracing::debug!(path, label, %method, "defining the collected metrics");
        let metrics = self.registry.register(label)?;

        let wrapped = on(filter.or(MethodFilter::OPTIONS), handler).route_layer(
            middleware::from_fn(move |req: Request, next: Next| {
                instrument(Arc::clone(&metrics), accepted.clone(), allow.clone(), req, next)
            }),
        );

        self.router = self.router.route(path, wrapped);
        self.paths.push(path.to_string());
        Ok(self)
    }

    /// Register a route that is served as-is, without metrics.
    pub fn route_uninstrumented(mut self, path: &str, route: MethodRouter<AppState>) -> Result<Self> {
        self.claim_path(path)?;
        self.router = self.router.route(path, route);
        self.paths.push(path.to_string());
        Ok(self)
    }

    /// Paths registered so far, in registration order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Close the table: unmatched paths with a trailing slash redirect to
    /// their registered form, anything else is 404.
    pub fn finish(self) -> Router<AppState> {
        let paths: Arc<[String]> = self.paths.into();
        self.router
            .fallback(move |uri: Uri| redirect_trailing_slash(Arc::clone(&paths), uri))
    }

    fn claim_path(&self, path: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(BeaconError::InvalidRoute(format!(
                "path {path:?} must start with '/'"
            )));
        }
        if self.paths.iter().any(|p| p == path) {
            return Err(BeaconError::InvalidRoute(format!(
                "path {path} is already registered"
            )));
        }
        Ok(())
    }
}

fn allow_methods(method: &Method) -> Result<HeaderValue> {
    let value = if *method == Method::OPTIONS {
        method.to_string()
    } else {
        format!("{method},{}", Method::OPTIONS)
    };
    HeaderValue::from_str(&value)
        .map_err(|_| BeaconError::InvalidRoute(format!("method {method} is not a valid header value")))
}

/// Per-request wrapper: time the inner handler, then record exactly one
/// observation with the final status. A panicking handler is recorded as 500.
///
/// Only the registered method and OPTIONS reach the handler; anything else
/// the method router let through (HEAD on a GET route) is a 405, unrecorded.
async fn instrument(
    metrics: Arc<RouteMetrics>,
    accepted: Method,
    allow: HeaderValue,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    if method != accepted && method != Method::OPTIONS {
        tracing::debug!(handler = metrics.label(), %method, "method not allowed");
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, allow)]).into_response();
    }
    let start = Instant::now();

    let mut res = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(res) => res,
        Err(_) => {
            tracing::error!(handler = metrics.label(), %method, "handler panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };

    let elapsed = start.elapsed();
    metrics.observe(res.status().as_u16(), method.as_str(), elapsed);
    tracing::trace!(
        handler = metrics.label(),
        %method,
        status = res.status().as_u16(),
        elapsed_us = elapsed.as_micros() as u64,
        "request observed"
    );

    res.headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_METHODS, allow);
    res
}

async fn redirect_trailing_slash(paths: Arc<[String]>, uri: Uri) -> Response {
    let path = uri.path();
    if let Some(trimmed) = path.strip_suffix('/').filter(|p| !p.is_empty()) {
        if paths.iter().any(|p| p == trimmed) {
            let location = match uri.query() {
                Some(q) => format!("{trimmed}?{q}"),
                None => trimmed.to_string(),
            };
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
        }
    }
    StatusCode::NOT_FOUND.into_response()
}
