//! Log file handling. The global subscriber is installed once in this binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::io::Write;

use beacon_core::error::{BeaconError, ErrorClass};
use beacon_server::config::{Config, LogLevel};
use beacon_server::obs::logging;

#[test]
fn log_file_is_created_then_appended() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");

    writeln!(logging::open_log_file(&path).unwrap(), "first").unwrap();
    writeln!(logging::open_log_file(&path).unwrap(), "second").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
}

#[test]
fn unopenable_log_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        log_file: Some(dir.path().join("missing").join("app.log")),
        ..Config::default()
    };

    let err = logging::init(&cfg).expect_err("directory does not exist");
    assert!(matches!(err, BeaconError::LogFile { .. }));
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn output_goes_to_log_file_at_configured_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("beacon.log");
    let cfg = Config {
        log_level: LogLevel::Info,
        ignored_log_level: Some("LOUD".into()),
        log_file: Some(path.clone()),
        ..Config::default()
    };

    logging::init(&cfg).unwrap();
    tracing::info!("visible line");
    tracing::debug!("hidden line");

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("unrecognized LOG level"));
    assert!(text.contains("LOUD"));
    assert!(text.contains("visible line"));
    assert!(!text.contains("hidden line"));
    // No color codes in files.
    assert!(!text.contains('\u{1b}'));
}
