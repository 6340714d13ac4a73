#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use beacon::core::MetricsRegistry;
use beacon::server::config;

#[test]
fn facade_reexports_core_and_server() {
    let reg = MetricsRegistry::new();
    reg.register("index")
        .unwrap()
        .observe(200, "GET", Duration::from_millis(1));
    assert!(reg.render().contains("index_http_requests_total"));

    let cfg = config::from_lookup(|_| None).unwrap();
    assert_eq!(cfg.port, config::DEFAULT_PORT);
}
