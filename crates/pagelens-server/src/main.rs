//! PageLens — local companion server for the page-capture workflow.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = pagelens_core::PageLensConfig::from_env();
    let port = config.port;

    info!(
        gateway = %config.gateway_url,
        webui = %config.webui_url,
        "PageLens starting"
    );

    let state = Arc::new(AppState::new(config));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("PageLens server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
