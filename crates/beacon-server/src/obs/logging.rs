//! `tracing` subscriber setup driven by `LOG` / `LOGFILE`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use beacon_core::error::{BeaconError, Result};
use tracing_subscriber::fmt;

use crate::config::Config;

/// Open (create or append) the log file.
pub fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| BeaconError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Install the global subscriber.
///
/// Output goes to stderr unless `log_file` is set, in which case the file is
/// the only sink and ANSI colors are off.
pub fn init(cfg: &Config) -> Result<()> {
    let builder = fmt().with_max_level(cfg.log_level.max_level());

    let installed = match &cfg.log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            builder
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| BeaconError::Config(format!("logging init failed: {e}")))?;

    if let Some(raw) = &cfg.ignored_log_level {
        tracing::warn!(value = %raw, "unrecognized LOG level, keeping INFO");
    }
    tracing::debug!(level = cfg.log_level.as_str(), "logging initialized");
    Ok(())
}

/// Plain stderr subscriber used to report errors that happen before (or
/// while) the configured one is installed. No-op if one is already set.
pub fn init_fallback() {
    let _ = fmt().with_writer(std::io::stderr).try_init();
}
