use thiserror::Error;

/// Message shown when a page yields no readable content.
pub const NO_CONTENT_MESSAGE: &str =
    "No extractable content found, try copy and paste text instead";

/// Failures of the extraction pipeline.
///
/// A failed direct fetch never appears here: it only switches the pipeline to
/// the headless fallback.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid URL format")]
    InvalidUrl(String),

    /// The browser could not be started at all (missing binary, bad profile dir).
    #[error("Failed to launch headless browser: {0}")]
    BrowserLaunch(String),

    #[error("Page navigation timeout")]
    NavigationTimeout,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("{NO_CONTENT_MESSAGE}")]
    NoContent,
}

impl ExtractionError {
    /// True when the caller supplied bad input; everything else is an API error.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExtractionError::InvalidUrl(_))
    }
}
