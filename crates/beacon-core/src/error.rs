//! Shared error type across beacon crates.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse error classes used when reporting a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Broken deployment: bad env values, duplicate routes, unwritable log file.
    Configuration,
    /// Listener or transport failure.
    Io,
}

impl ErrorClass {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Configuration => "CONFIGURATION",
            ErrorClass::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BeaconError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("duplicate metrics collector registration attempted: {0}")]
    DuplicateMetric(String),
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("error opening log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl BeaconError {
    pub fn class(&self) -> ErrorClass {
        match self {
            BeaconError::DuplicateMetric(_)
            | BeaconError::InvalidRoute(_)
            | BeaconError::Config(_)
            | BeaconError::LogFile { .. } => ErrorClass::Configuration,
            BeaconError::Bind { .. } | BeaconError::Io(_) => ErrorClass::Io,
        }
    }
}
