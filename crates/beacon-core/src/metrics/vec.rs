//! Labelled counter and histogram vectors.
//!
//! Series are keyed by their label pairs, flattened into a sorted vector so
//! `[("method", "get"), ("code", "200")]` and `[("code", "200"), ("method", "get")]`
//! land on the same accumulator. Every accumulator is a plain atomic, so
//! concurrent requests never lose increments and no lock is held while a
//! value is updated.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

type SeriesKey = Vec<(String, String)>;

/// Upper bounds of the Prometheus client default buckets, in nanoseconds
/// (0.005s .. 10s).
const BUCKETS_NANOS: [u64; 11] = [
    5_000_000,
    10_000_000,
    25_000_000,
    50_000_000,
    100_000_000,
    250_000_000,
    500_000_000,
    1_000_000_000,
    2_500_000_000,
    5_000_000_000,
    10_000_000_000,
];

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn series_key(labels: &[(&str, &str)]) -> SeriesKey {
    let mut key: SeriesKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &SeriesKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help.replace('\\', "\\\\").replace('\n', "\\n"));
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn seconds(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_SEC
}

pub struct CounterVec {
    name: String,
    help: String,
    map: DashMap<SeriesKey, AtomicU64>,
}

impl CounterVec {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            map: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(series_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series; 0 when it was never touched.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&series_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format. Nothing is written until
    /// at least one series exists.
    pub fn render(&self, out: &mut String) {
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().load(Ordering::Relaxed)))
            .collect();
        if rows.is_empty() {
            return;
        }
        rows.sort();

        write_header(out, &self.name, &self.help, "counter");
        for (labels, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", self.name, labels, val);
        }
    }
}

/// count, sum and buckets are independent atomics: a scrape racing an
/// observation may see `_count` one step ahead of `_sum` or a bucket.
struct AtomicHistogram {
    count: AtomicU64,
    sum_nanos: AtomicU64,
    buckets: [AtomicU64; BUCKETS_NANOS.len()],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_nanos: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

pub struct HistogramVec {
    name: String,
    help: String,
    map: DashMap<SeriesKey, AtomicHistogram>,
}

impl HistogramVec {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            map: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observe a duration and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(series_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_nanos.fetch_add(nanos, Ordering::Relaxed);

        // Cumulative: every bucket whose bound covers the value.
        for (i, &b) in BUCKETS_NANOS.iter().enumerate() {
            if nanos <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations recorded for one series.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&series_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum of the observed durations for one series, in seconds.
    pub fn sum_seconds(&self, labels: &[(&str, &str)]) -> f64 {
        self.map
            .get(&series_key(labels))
            .map(|h| seconds(h.sum_nanos.load(Ordering::Relaxed)))
            .unwrap_or(0.0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    pub fn render(&self, out: &mut String) {
        let mut rows: Vec<(String, Vec<u64>, u64, u64)> = self
            .map
            .iter()
            .map(|r| {
                let hist = r.value();
                let buckets = hist
                    .buckets
                    .iter()
                    .map(|b| b.load(Ordering::Relaxed))
                    .collect();
                (
                    label_str(r.key()),
                    buckets,
                    hist.sum_nanos.load(Ordering::Relaxed),
                    hist.count.load(Ordering::Relaxed),
                )
            })
            .collect();
        if rows.is_empty() {
            return;
        }
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        write_header(out, &self.name, &self.help, "histogram");
        for (labels, buckets, sum, count) in rows {
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };
            for (le, n) in BUCKETS_NANOS.iter().zip(buckets) {
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    self.name,
                    prefix,
                    seconds(*le),
                    n
                );
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", self.name, prefix, count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", self.name, labels, seconds(sum));
            let _ = writeln!(out, "{}_count{{{}}} {}", self.name, labels, count);
        }
    }
}
