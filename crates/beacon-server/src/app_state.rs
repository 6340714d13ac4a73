//! Shared application state.
//!
//! Holds the resolved configuration and the metrics registry. Cloning is
//! cheap (one `Arc`).

use std::sync::Arc;

use beacon_core::MetricsRegistry;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: Config,
    metrics: Arc<MetricsRegistry>,
}

impl AppState {
    /// State with a fresh, empty registry.
    pub fn new(cfg: Config) -> Self {
        Self::with_registry(cfg, Arc::new(MetricsRegistry::new()))
    }

    pub fn with_registry(cfg: Config, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg, metrics }),
        }
    }

    pub fn cfg(&self) -> &Config {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.inner.metrics)
    }
}
