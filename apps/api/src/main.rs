mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
// Client-side state machines; the server binary itself never drives them.
#[cfg_attr(not(test), allow(dead_code))]
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS scanner API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let text_generator: Option<Arc<dyn TextGenerator>> = match &config.google_api_key {
        Some(key) => {
            let client =
                GeminiClient::new(key.clone(), &config.gemini_api_base, config.llm_timeout_secs)?;
            info!(
                "Gemini client initialized (model: {}, timeout: {}s)",
                config.gemini_model, config.llm_timeout_secs
            );
            Some(Arc::new(client) as Arc<dyn TextGenerator>)
        }
        None => {
            warn!("GOOGLE_API_KEY not set; analysis endpoints will report a configuration error");
            None
        }
    };

    let state = AppState::new(config.clone(), text_generator);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
