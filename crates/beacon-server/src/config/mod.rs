//! Environment-driven configuration.
//!
//! Everything is read once through [`from_env`]; the rest of the program only
//! sees the resulting [`Config`]. [`from_lookup`] takes any key lookup so tests
//! never touch the process environment.

pub mod schema;

use std::path::PathBuf;

use beacon_core::error::{BeaconError, Result};

pub use schema::{Config, LogLevel, DEFAULT_PORT};

pub const ENV_PORT: &str = "PORT";
pub const ENV_APP_NAME: &str = "APP_NAME";
pub const ENV_APP_VERSION: &str = "APP_VERSION";
pub const ENV_LOG: &str = "LOG";
pub const ENV_LOGFILE: &str = "LOGFILE";

pub fn from_env() -> Result<Config> {
    from_lookup(|key| std::env::var(key).ok())
}

pub fn from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // Empty values count as unset.
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    let (port, custom_port) = match get(ENV_PORT) {
        Some(raw) => {
            let port = raw.trim().parse::<u16>().map_err(|e| {
                BeaconError::Config(format!("{ENV_PORT}={raw:?} is not a valid port: {e}"))
            })?;
            (port, true)
        }
        None => (DEFAULT_PORT, false),
    };

    let (log_level, ignored_log_level) = match get(ENV_LOG) {
        Some(raw) => match LogLevel::parse(&raw) {
            Some(level) => (level, None),
            None => (LogLevel::default(), Some(raw)),
        },
        None => (LogLevel::default(), None),
    };

    Ok(Config {
        port,
        custom_port,
        app_name: get(ENV_APP_NAME).unwrap_or_default(),
        app_version: get(ENV_APP_VERSION).unwrap_or_default(),
        log_level,
        ignored_log_level,
        log_file: get(ENV_LOGFILE).map(PathBuf::from),
    })
}
