//! Extraction pipeline: validate → direct fetch → (headless fallback) → readability.

use std::sync::Arc;

use tracing::{info, warn};

use crate::extraction::error::ExtractionError;
use crate::extraction::fetch::PageFetcher;
use crate::extraction::readability::ReadabilityExtractor;
use crate::extraction::render::HeadlessRenderer;
use crate::extraction::validation::validate_url;

/// Which retrieval strategy produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalPath {
    Direct,
    Rendered,
}

/// Main-content text isolated from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text_content: String,
    pub source: RetrievalPath,
}

/// Stateless orchestrator shared by all requests.
#[derive(Clone)]
pub struct ExtractionPipeline {
    fetcher: Arc<dyn PageFetcher>,
    renderer: HeadlessRenderer,
    extractor: ReadabilityExtractor,
}

impl ExtractionPipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        renderer: HeadlessRenderer,
        extractor: ReadabilityExtractor,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            extractor,
        }
    }

    /// Extracts the main text of the page at `raw_url`.
    ///
    /// Validation runs before any I/O. A failed direct fetch is not an error:
    /// it switches to a one-shot headless render. Whatever HTML was obtained
    /// goes through readability exactly once.
    pub async fn extract(&self, raw_url: &str) -> Result<ExtractedContent, ExtractionError> {
        let url = validate_url(raw_url)?;

        let (html, source) = match self.fetcher.fetch(&url).await {
            // Static HTML: page scripts only ever run in the rendered path.
            Ok(html) => (html, RetrievalPath::Direct),
            Err(e) => {
                warn!("Direct fetch of {url} failed ({e}), rendering in headless browser");
                let html = self.renderer.render(&url).await?;
                (html, RetrievalPath::Rendered)
            }
        };

        let text_content = self.extractor.extract(&html, &url)?;

        info!(
            "Extracted {} chars from {url} via {source:?}",
            text_content.len()
        );

        Ok(ExtractedContent {
            text_content,
            source,
        })
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::{pipeline, StubFetcher};
    use super::*;
    use crate::extraction::readability::fixtures::{EMPTY_SHELL, JOB_POSTING};
    use crate::extraction::render::testing::{Script, ScriptedLauncher};

    const URL: &str = "https://careers.acme.example/jobs/senior-backend";

    #[tokio::test]
    async fn test_invalid_url_touches_no_network() {
        let (pipeline, fetcher, counters) = pipeline(
            StubFetcher::serving(JOB_POSTING),
            ScriptedLauncher::new(Script::Render, JOB_POSTING),
        );

        for input in ["ftp://example.com", "example.com", "http://", ""] {
            let err = pipeline.extract(input).await.unwrap_err();
            assert!(err.is_validation());
        }

        assert_eq!(fetcher.calls(), 0);
        assert_eq!(counters.launches(), 0);
    }

    #[tokio::test]
    async fn test_direct_fetch_success_skips_browser() {
        let (pipeline, fetcher, counters) = pipeline(
            StubFetcher::serving(JOB_POSTING),
            ScriptedLauncher::new(Script::Render, JOB_POSTING),
        );

        let content = pipeline.extract(URL).await.unwrap();

        assert_eq!(content.source, RetrievalPath::Direct);
        assert!(content.text_content.contains("Senior Backend Engineer"));
        assert!(!content.text_content.contains("ADMARKER"));
        assert!(!content.text_content.contains("NAVLINK"));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(counters.launches(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_render() {
        let (pipeline, _fetcher, counters) = pipeline(
            StubFetcher::failing(),
            ScriptedLauncher::new(Script::Render, JOB_POSTING),
        );

        let content = pipeline.extract(URL).await.unwrap();

        assert_eq!(content.source, RetrievalPath::Rendered);
        assert!(content.text_content.contains("Responsibilities"));
        assert_eq!(counters.launches(), 1);
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_hang_is_a_timeout_within_bound() {
        let (pipeline, _fetcher, counters) = pipeline(
            StubFetcher::failing(),
            ScriptedLauncher::new(Script::HangOnNavigate, JOB_POSTING),
        );

        let started = tokio::time::Instant::now();
        let err = pipeline.extract(URL).await.unwrap_err();

        assert!(matches!(err, ExtractionError::NavigationTimeout));
        assert!(started.elapsed() < Duration::from_secs(61));
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test]
    async fn test_launch_failure_is_not_retried() {
        let (pipeline, fetcher, counters) = pipeline(
            StubFetcher::failing(),
            ScriptedLauncher::new(Script::FailLaunch, JOB_POSTING),
        );

        let err = pipeline.extract(URL).await.unwrap_err();

        assert!(matches!(err, ExtractionError::BrowserLaunch(_)));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(counters.closes(), 0);
    }

    #[tokio::test]
    async fn test_rendered_shell_without_content_is_an_error() {
        let (pipeline, _fetcher, counters) = pipeline(
            StubFetcher::failing(),
            ScriptedLauncher::new(Script::Render, EMPTY_SHELL),
        );

        let err = pipeline.extract(URL).await.unwrap_err();

        assert!(matches!(err, ExtractionError::NoContent));
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test]
    async fn test_direct_shell_without_content_does_not_render() {
        let (pipeline, _fetcher, counters) = pipeline(
            StubFetcher::serving(EMPTY_SHELL),
            ScriptedLauncher::new(Script::Render, JOB_POSTING),
        );

        let err = pipeline.extract(URL).await.unwrap_err();

        assert!(matches!(err, ExtractionError::NoContent));
        assert_eq!(counters.launches(), 0);
    }

    #[tokio::test]
    async fn test_same_page_twice_yields_same_text() {
        let (pipeline, _fetcher, _counters) = pipeline(
            StubFetcher::serving(JOB_POSTING),
            ScriptedLauncher::new(Script::Render, JOB_POSTING),
        );

        let first = pipeline.extract(URL).await.unwrap();
        let second = pipeline.extract(URL).await.unwrap();

        assert_eq!(first, second);
    }
}
