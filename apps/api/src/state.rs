use crate::config::Config;
use crate::extraction::ExtractionPipeline;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything in here is built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Fetch → headless fallback → readability, with its shared HTTP client.
    pub extraction: ExtractionPipeline,
    pub llm: LlmClient,
}
