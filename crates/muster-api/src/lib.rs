pub mod handlers;
pub mod page;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub use handlers::ApiState;

/// Build the HTTP surface. Paths no route claims fall through to the static
/// file directory.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(page::handle_index))
        .route(
            "/serverListings",
            get(handlers::handle_get_listings).put(handlers::handle_put_listings),
        )
        .route("/config", get(handlers::handle_config))
        .route("/stats", get(handlers::handle_stats))
        .fallback_service(static_files)
        .with_state(state)
        .layer(cors)
}

/// Bind `bind:port` and serve until `shutdown` fires.
pub async fn serve(
    state: ApiState,
    bind: &str,
    port: u16,
    shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("{}:{}", bind, port)).await?;
    serve_on(listener, state, shutdown).await
}

/// Serve on an already-bound listener. Handlers see each connection's peer
/// address, which is what keys a reporter's listings.
pub async fn serve_on(
    listener: TcpListener,
    state: ApiState,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "API listening");

    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("API shutting down");
        })
        .await?;
    Ok(())
}
