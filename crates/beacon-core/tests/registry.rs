#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use beacon_core::error::{BeaconError, ErrorClass};
use beacon_core::MetricsRegistry;

#[test]
fn register_names_metrics_after_label() {
    let reg = MetricsRegistry::new();
    let m = reg.register("index").unwrap();
    assert_eq!(m.label(), "index");
    assert_eq!(m.requests_name(), "index_http_requests_total");
    assert_eq!(m.duration_name(), "index_http_request_duration_seconds");
    assert_eq!(reg.labels(), vec!["index".to_string()]);
}

#[test]
fn duplicate_label_is_configuration_error() {
    let reg = MetricsRegistry::new();
    reg.register("health").unwrap();

    let err = reg.register("health").err().expect("second registration must fail");
    assert!(matches!(err, BeaconError::DuplicateMetric(ref name) if name == "health_http_requests_total"));
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert_eq!(reg.labels().len(), 1);
}

#[test]
fn invalid_labels_are_rejected() {
    let reg = MetricsRegistry::new();
    for bad in ["", "9lives", "with-dash", "sp ace"] {
        let err = reg.register(bad).err().expect("must fail");
        assert!(matches!(err, BeaconError::InvalidRoute(_)), "label {bad:?}");
    }
    assert!(reg.is_empty());
    assert!(reg.register("_private:ok2").is_ok());
}

#[test]
fn counts_are_partitioned_by_code_and_method() {
    let reg = MetricsRegistry::new();
    let m = reg.register("index").unwrap();

    for _ in 0..3 {
        m.observe(200, "GET", Duration::from_millis(1));
    }
    m.observe(500, "GET", Duration::from_millis(1));
    m.observe(200, "OPTIONS", Duration::from_millis(1));

    assert_eq!(m.requests(200, "GET"), 3);
    assert_eq!(m.requests(200, "get"), 3);
    assert_eq!(m.requests(500, "GET"), 1);
    assert_eq!(m.requests(200, "OPTIONS"), 1);
    assert_eq!(m.requests(404, "GET"), 0);
    assert_eq!(m.observations(200, "GET"), 3);
    assert!(m.duration_seconds(200, "GET") >= 0.003);
}

#[test]
fn get_returns_the_registered_pair() {
    let reg = MetricsRegistry::new();
    let m = reg.register("liveness").unwrap();
    m.observe(200, "GET", Duration::ZERO);

    let same = reg.get("liveness").unwrap();
    assert!(Arc::ptr_eq(&m, &same));
    assert_eq!(same.requests(200, "GET"), 1);
    assert!(reg.get("missing").is_none());
}

#[test]
fn concurrent_increments_are_not_lost() {
    let reg = MetricsRegistry::new();
    let m = reg.register("health").unwrap();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    m.observe(200, "GET", Duration::from_micros(10));
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(m.requests(200, "GET"), 8_000);
    assert_eq!(m.observations(200, "GET"), 8_000);
}
