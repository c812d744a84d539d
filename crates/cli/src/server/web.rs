use axum::Router;
use ferrous_probe_api::{create_api_routes, AppState};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Serves the job API until `shutdown` fires.
pub async fn start_web_server(
    bind_addr: SocketAddr,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    info!(
        bind_address = %bind_addr,
        api_url = format!("http://{}", bind_addr),
        "Starting job API server"
    );

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Job API server started successfully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    create_api_routes(state).layer(TraceLayer::new_for_http())
}
