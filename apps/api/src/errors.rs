use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::error::NO_CONTENT_MESSAGE;
use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Coarse error class carried as a prefix of every error message.
/// The UI splits on it: validation errors render inline, API errors as a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Api,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Validation => "VALIDATION_ERROR",
            ErrorClass::Api => "API_ERROR",
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The page was fetched but nothing readable was found.
    #[error("Unextractable: {0}")]
    Unextractable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Browser unavailable: {0}")]
    BrowserUnavailable(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidUrl(ref input) => {
                tracing::debug!("Rejected URL input {input:?}");
                AppError::Validation(err.to_string())
            }
            ExtractionError::NoContent => AppError::Unextractable(err.to_string()),
            // A page that cannot be reached is the user's to retry, like a hang.
            ExtractionError::NavigationTimeout | ExtractionError::Navigation(_) => {
                AppError::Timeout(err.to_string())
            }
            ExtractionError::BrowserLaunch(msg) => AppError::BrowserUnavailable(msg),
            ExtractionError::Render(_) | ExtractionError::Parse(_) => {
                AppError::Extraction(err.to_string())
            }
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorClass, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorClass::Validation, msg.clone()),
            AppError::Unextractable(_) => (
                StatusCode::BAD_REQUEST,
                ErrorClass::Api,
                NO_CONTENT_MESSAGE.to_string(),
            ),
            AppError::Timeout(msg) => {
                tracing::warn!("Page navigation failed: {msg}");
                (
                    StatusCode::REQUEST_TIMEOUT,
                    ErrorClass::Api,
                    ExtractionError::NavigationTimeout.to_string(),
                )
            }
            AppError::BrowserUnavailable(msg) => {
                tracing::error!("Headless browser unavailable: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorClass::Api,
                    "Headless browser unavailable, try copy and paste text instead".to_string(),
                )
            }
            AppError::Extraction(msg) => {
                tracing::error!("Extraction error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorClass::Api,
                    "Failed to extract content from URL".to_string(),
                )
            }
            AppError::Llm(LlmError::MissingApiKey) => {
                tracing::error!("LLM call attempted without TOGETHER_API_KEY");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorClass::Api,
                    "Bullet generation is not configured".to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorClass::Api,
                    "The language model request failed".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, class, message) = self.parts();

        let body = Json(json!({
            "error": format!("{}: {message}", class.as_str())
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, value["error"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_invalid_url_is_prefixed_validation_400() {
        let err: AppError = ExtractionError::InvalidUrl("nope".into()).into();
        let (status, message) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "VALIDATION_ERROR: Invalid URL format");
    }

    #[tokio::test]
    async fn test_navigation_timeout_is_api_408() {
        let err: AppError = ExtractionError::NavigationTimeout.into();
        let (status, message) = body_of(err).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(message, "API_ERROR: Page navigation timeout");
    }

    #[tokio::test]
    async fn test_unreachable_page_is_api_408() {
        let err: AppError = ExtractionError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()).into();
        let (status, message) = body_of(err).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(message, "API_ERROR: Page navigation timeout");
    }

    #[tokio::test]
    async fn test_no_content_is_api_400_with_paste_hint() {
        let err: AppError = ExtractionError::NoContent.into();
        let (status, message) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.starts_with("API_ERROR: "));
        assert!(message.contains("copy and paste"));
    }

    #[tokio::test]
    async fn test_launch_failure_is_api_500_without_internals() {
        let err: AppError = ExtractionError::BrowserLaunch("/usr/bin/chrome: ENOENT".into()).into();
        let (status, message) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.starts_with("API_ERROR: "));
        assert!(!message.contains("ENOENT"));
    }

    #[tokio::test]
    async fn test_render_failure_is_generic_api_500() {
        let err: AppError = ExtractionError::Render("target closed".into()).into();
        let (status, message) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "API_ERROR: Failed to extract content from URL");
    }

    #[tokio::test]
    async fn test_upstream_llm_rejection_is_502() {
        let err = AppError::Llm(LlmError::Api {
            status: 401,
            message: "bad key".into(),
        });
        let (status, message) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(message.starts_with("API_ERROR: "));
    }

    #[tokio::test]
    async fn test_missing_llm_key_is_500() {
        let (status, _) = body_of(AppError::Llm(LlmError::MissingApiKey)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
