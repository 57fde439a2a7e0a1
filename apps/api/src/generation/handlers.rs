//! Axum route handler for the Generation API.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::BULLET_WRITER_SYSTEM;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Overrides the configured default model.
    pub model: Option<String>,
}

/// POST /generate
///
/// Streams numbered resume bullets for the given prompt. The upstream
/// server-sent events are passed through byte for byte.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;

    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let model = request.model.as_deref().filter(|m| !m.trim().is_empty());
    let stream = state
        .llm
        .stream_chat(BULLET_WRITER_SYSTEM, &request.prompt, model)
        .await?;

    info!("Relaying bullet stream ({} prompt chars)", request.prompt.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
