mod analysis;
mod config;
mod document;
mod errors;
mod render;
mod routes;
mod state;
mod tasks;

use anyhow::Result;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::gateway::{self, AnalysisGateway};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tasks::TaskStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Enhancer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the analysis gateway
    let gateway = AnalysisGateway::new(config.ollama_url.clone());
    info!(
        "Analysis gateway initialized (service: {}, model: {})",
        config.ollama_url,
        gateway::MODEL
    );

    // Build app state
    let state = AppState {
        gateway: Arc::new(gateway),
        uploads: TaskStore::new(),
        analyses: TaskStore::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ))
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
