//! Listener bootstrap.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use beacon_core::error::{BeaconError, Result};

use crate::{app_state::AppState, config::Config, router};

pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| BeaconError::Bind { addr, source })
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build state and routes from `cfg`, bind, and serve until the listener fails.
///
/// Route registration happens before the bind, so a broken route table never
/// opens the port.
pub async fn run(cfg: Config) -> Result<()> {
    if cfg.custom_port {
        tracing::trace!(port = cfg.port, "found a custom port");
    }
    let addr = cfg.listen_addr();

    let state = AppState::new(cfg);
    let app = router::build_router(state)?;

    let listener = bind(addr).await?;
    tracing::info!(%addr, "server started");
    serve(listener, app).await
}
