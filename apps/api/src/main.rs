mod analysis;
mod assistant;
mod config;
mod errors;
mod extraction;
mod models;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::ollama::OllamaAssistant;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dianelle API v{}", env!("CARGO_PKG_VERSION"));

    // Bad weights or an empty stopword list stop the process here, not mid-request
    let settings = config.analysis_settings()?;
    info!(
        "Scoring weights: {:?}, keyword limit {}",
        settings.weights, settings.keyword_limit
    );

    let assistant = OllamaAssistant::new(
        &config.ollama_url,
        &config.ollama_model,
        config.assistant_timeout_secs,
    )?;
    info!(
        "Assistant client initialized ({} at {})",
        assistant.model(),
        config.ollama_url
    );

    let state = AppState {
        config: config.clone(),
        settings,
        assistant: Arc::new(assistant),
        sessions: SessionStore::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
