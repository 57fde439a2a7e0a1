mod config;
mod errors;
mod extraction;
mod generation;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::chrome::ChromeLauncher;
use crate::extraction::fetch::HttpFetcher;
use crate::extraction::readability::ReadabilityExtractor;
use crate::extraction::render::{HeadlessRenderer, RenderTimeouts};
use crate::extraction::ExtractionPipeline;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bullets API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize extraction pipeline (one HTTP client, one browser per fallback)
    let extraction = build_pipeline(&config)?;
    match &config.extraction.chrome_executable {
        Some(path) => info!("Headless fallback uses {}", path.display()),
        None => info!("Headless fallback discovers Chrome from PATH"),
    }

    // Initialize LLM client
    let llm = LlmClient::new(
        config.together_api_key.clone(),
        config.llm_base_url.clone(),
        config.together_model.clone(),
    )
    .context("Failed to build LLM HTTP client")?;
    if config.together_api_key.is_some() {
        info!("LLM client initialized (model: {})", config.together_model);
    } else {
        tracing::warn!("TOGETHER_API_KEY not set; /generate will be unavailable");
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        extraction,
        llm,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires the direct fetcher, the Chrome fallback and readability together.
fn build_pipeline(config: &Config) -> Result<ExtractionPipeline> {
    let settings = &config.extraction;

    let fetcher = HttpFetcher::new(settings).context("Failed to build fetch HTTP client")?;
    let renderer = HeadlessRenderer::new(
        Arc::new(ChromeLauncher::new(settings.clone())),
        RenderTimeouts {
            navigation: settings.navigation_timeout(),
            body: settings.body_timeout(),
        },
    );
    let extractor = ReadabilityExtractor::new(settings.readability.clone());

    Ok(ExtractionPipeline::new(
        Arc::new(fetcher),
        renderer,
        extractor,
    ))
}
