//! Label-keyed registry of per-route metric pairs.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{BeaconError, Result};

use super::vec::{CounterVec, HistogramVec};

/// Counter + histogram bundle tracked for one route label.
///
/// Metric names are `<label>_http_requests_total` (dimensions `code`, `method`)
/// and `<label>_http_request_duration_seconds` (dimensions `code`, `handler`,
/// `method`). The method dimension is always lower-cased.
pub struct RouteMetrics {
    label: String,
    requests: CounterVec,
    duration: HistogramVec,
}

impl RouteMetrics {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            requests: CounterVec::new(
                format!("{label}_http_requests_total"),
                format!("Count of all HTTP requests on /{label}"),
            ),
            duration: HistogramVec::new(
                format!("{label}_http_request_duration_seconds"),
                format!("Duration of all HTTP requests of /{label}"),
            ),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn requests_name(&self) -> &str {
        self.requests.name()
    }

    pub fn duration_name(&self) -> &str {
        self.duration.name()
    }

    fn duration_labels<'a>(&'a self, code: &'a str, method: &'a str) -> [(&'a str, &'a str); 3] {
        [("code", code), ("handler", self.label.as_str()), ("method", method)]
    }

    /// Record one completed request.
    pub fn observe(&self, code: u16, method: &str, elapsed: Duration) {
        let (code, method) = dimensions(code, method);
        self.requests.inc(&[("code", &*code), ("method", &*method)]);
        self.duration.observe(&self.duration_labels(&code, &method), elapsed);
    }

    /// Requests counted for `(code, method)`.
    pub fn requests(&self, code: u16, method: &str) -> u64 {
        let (code, method) = dimensions(code, method);
        self.requests.get(&[("code", &*code), ("method", &*method)])
    }

    /// Durations observed for `(code, method)`.
    pub fn observations(&self, code: u16, method: &str) -> u64 {
        let (code, method) = dimensions(code, method);
        self.duration.count(&self.duration_labels(&code, &method))
    }

    /// Total observed time for `(code, method)`, in seconds.
    pub fn duration_seconds(&self, code: u16, method: &str) -> f64 {
        let (code, method) = dimensions(code, method);
        self.duration.sum_seconds(&self.duration_labels(&code, &method))
    }

    fn render_into(&self, families: &mut Vec<(String, String)>) {
        let mut out = String::new();
        self.requests.render(&mut out);
        families.push((self.requests.name().to_string(), out));

        let mut out = String::new();
        self.duration.render(&mut out);
        families.push((self.duration.name().to_string(), out));
    }
}

fn dimensions(code: u16, method: &str) -> (String, String) {
    (code.to_string(), method.to_ascii_lowercase())
}

/// Whether `label` can prefix a Prometheus metric name
/// (`[a-zA-Z_:][a-zA-Z0-9_:]*`).
fn is_valid_label(label: &str) -> bool {
    let mut chars = label.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// All metric pairs of the process, keyed by route label.
#[derive(Default)]
pub struct MetricsRegistry {
    routes: DashMap<String, Arc<RouteMetrics>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register the metric pair for `label`.
    ///
    /// A label can be registered once; a second attempt is a configuration
    /// error.
    pub fn register(&self, label: &str) -> Result<Arc<RouteMetrics>> {
        if !is_valid_label(label) {
            return Err(BeaconError::InvalidRoute(format!(
                "label {label:?} is not a valid metric name prefix"
            )));
        }

        match self.routes.entry(label.to_string()) {
            Entry::Occupied(_) => Err(BeaconError::DuplicateMetric(format!(
                "{label}_http_requests_total"
            ))),
            Entry::Vacant(slot) => {
                let metrics = Arc::new(RouteMetrics::new(label));
                slot.insert(Arc::clone(&metrics));
                tracing::debug!(label, "registered route metrics");
                Ok(metrics)
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<Arc<RouteMetrics>> {
        self.routes.get(label).map(|r| Arc::clone(r.value()))
    }

    /// Registered labels, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.routes.iter().map(|r| r.key().clone()).collect();
        labels.sort();
        labels
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Render every family in Prometheus text exposition format, sorted by
    /// metric name. Families without observations are omitted, so a fresh
    /// registry renders an empty document.
    pub fn render(&self) -> String {
        let routes: Vec<Arc<RouteMetrics>> =
            self.routes.iter().map(|r| Arc::clone(r.value())).collect();

        let mut families = Vec::with_capacity(routes.len() * 2);
        for route in &routes {
            route.render_into(&mut families);
        }
        families.sort_by(|a, b| a.0.cmp(&b.0));

        families.into_iter().map(|(_, text)| text).collect()
    }
}
