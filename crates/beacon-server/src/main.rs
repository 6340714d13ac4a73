//! beacon-server
//!
//! Static JSON endpoints (`/`, `/health`, `/liveness`) with per-route request
//! counters and latency histograms, plus `/metrics` for scraping.
//!
//! Configuration comes from the environment: `PORT`, `APP_NAME`,
//! `APP_VERSION`, `LOG`, `LOGFILE`. Any startup error is fatal.

use std::process::ExitCode;

use beacon_core::BeaconError;
use beacon_server::{config, obs::logging, server};

fn fatal(err: &BeaconError) -> ExitCode {
    logging::init_fallback();
    tracing::error!(class = err.class().as_str(), "{err}");
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => return fatal(&err),
    };
    if let Err(err) = logging::init(&cfg) {
        return fatal(&err);
    }

    match server::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fatal(&err),
    }
}
