//! Headless-browser fallback.
//!
//! The browser is a scoped resource: [`HeadlessRenderer::render`] launches one
//! session per call and closes it on every return path. Dropping a session
//! without closing it (the request future was cancelled) must still tear the
//! process down; implementations carry their own drop guard for that case.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::extraction::error::ExtractionError;

/// Starts isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractionError>;
}

/// One running browser with a single page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates and resolves once the DOM content has loaded.
    async fn navigate(&mut self, url: &Url) -> Result<(), ExtractionError>;

    /// Resolves once a `body` element exists in the document.
    async fn wait_for_body(&mut self) -> Result<(), ExtractionError>;

    /// Serialized HTML of the rendered document.
    async fn content(&mut self) -> Result<String, ExtractionError>;

    /// Shuts the browser down. Must not fail; problems are logged.
    async fn close(self: Box<Self>);
}

#[derive(Debug, Clone, Copy)]
pub struct RenderTimeouts {
    pub navigation: Duration,
    pub body: Duration,
}

/// Renders pages through a freshly launched browser.
#[derive(Clone)]
pub struct HeadlessRenderer {
    launcher: Arc<dyn BrowserLauncher>,
    timeouts: RenderTimeouts,
}

impl HeadlessRenderer {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, timeouts: RenderTimeouts) -> Self {
        Self { launcher, timeouts }
    }

    /// Launch, render, close. A launch failure acquires nothing and returns
    /// `BrowserLaunch`; any later failure still closes the session first.
    pub async fn render(&self, url: &Url) -> Result<String, ExtractionError> {
        let mut session = self.launcher.launch().await?;
        debug!("Browser session launched for {url}");

        let result = self.render_in(session.as_mut(), url).await;

        session.close().await;
        debug!("Browser session closed for {url}");

        result
    }

    async fn render_in(
        &self,
        session: &mut dyn BrowserSession,
        url: &Url,
    ) -> Result<String, ExtractionError> {
        match tokio::time::timeout(self.timeouts.navigation, session.navigate(url)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "Navigation to {url} exceeded {}s",
                    self.timeouts.navigation.as_secs()
                );
                return Err(ExtractionError::NavigationTimeout);
            }
        }

        // Shell documents may populate the body asynchronously.
        match tokio::time::timeout(self.timeouts.body, session.wait_for_body()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "No body element on {url} after {}s",
                    self.timeouts.body.as_secs()
                );
                return Err(ExtractionError::NavigationTimeout);
            }
        }

        session.content().await
    }
}
