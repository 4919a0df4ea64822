use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use service::Catalog;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve `state` on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: ServerState, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(state);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Open the catalog, bind the configured address and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    common::env::ensure_parent_dir(&cfg.storage.path).await?;
    let catalog = Catalog::open(cfg.storage.path.clone()).await?;
    let state = ServerState::new(catalog);

    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}: {e}", cfg.bind_addr())))?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, path = %cfg.storage.path.display(), "bookstore rpc listening");

    serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
    })
    .await
}
