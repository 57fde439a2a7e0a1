//! Axum route handler for the Extraction API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub content: String,
}

/// POST /extract
///
/// Returns the main text of the job posting at `url`. An unreadable body is
/// reported like a malformed URL so the UI can show it inline.
pub async fn handle_extract(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;

    let span = tracing::info_span!("extract", extraction_id = %Uuid::new_v4());
    let extracted = state
        .extraction
        .extract(&request.url)
        .instrument(span)
        .await
        .inspect_err(|e| {
            if !e.is_validation() {
                warn!("Extraction of {} failed: {e}", request.url);
            }
        })?;
    debug!("Serving extraction via {:?}", extracted.source);

    Ok(Json(ExtractResponse {
        content: extracted.text_content,
    }))
}
