//! chromiumoxide-backed browser sessions.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::json;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::extraction::config::ExtractionConfig;
use crate::extraction::error::ExtractionError;
use crate::extraction::render::{BrowserLauncher, BrowserSession};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// DOM content loaded on the target document, not the `about:blank` we started from.
const DOM_READY_SCRIPT: &str =
    "document.location.href !== 'about:blank' && document.readyState !== 'loading'";

/// Launches one headless Chromium per call, each with a throwaway profile.
pub struct ChromeLauncher {
    config: ExtractionConfig,
}

impl ChromeLauncher {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self, profile: &TempDir) -> Result<BrowserConfig, String> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(profile.path())
            .window_size(self.config.viewport_width, self.config.viewport_height)
            .request_timeout(self.config.navigation_timeout())
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--ignore-certificate-errors")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg(format!("--user-agent={}", self.config.user_agent));

        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build()
    }

    fn extra_headers(&self) -> serde_json::Value {
        json!({
            "User-Agent": self.config.user_agent,
            "Accept-Language": self.config.accept_language,
            "Accept": self.config.accept,
            "Referer": self.config.referer,
        })
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractionError> {
        let profile = tempfile::Builder::new()
            .prefix("bullets-chrome-")
            .tempdir()
            .map_err(|e| ExtractionError::BrowserLaunch(format!("profile dir: {e}")))?;

        let browser_config = self
            .browser_config(&profile)
            .map_err(ExtractionError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ExtractionError::BrowserLaunch(format!(
                "{e}. Is Chrome or Chromium installed, or CHROME_BIN set?"
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e:?}");
                }
            }
        });

        Ok(Box::new(ChromeSession {
            browser,
            handler,
            page: None,
            extra_headers: self.extra_headers(),
            viewport: (self.config.viewport_width, self.config.viewport_height),
            _profile: profile,
        }))
    }
}

/// A running Chromium with at most one page.
///
/// Field order matters on drop: the browser (which kills its child process)
/// goes before the profile directory is removed.
struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    extra_headers: serde_json::Value,
    viewport: (u32, u32),
    _profile: TempDir,
}

impl ChromeSession {
    fn page(&self) -> Result<&Page, ExtractionError> {
        self.page
            .as_ref()
            .ok_or_else(|| ExtractionError::Render("no page open".to_string()))
    }

    async fn open_page(&mut self) -> Result<Page, ExtractionError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExtractionError::Render(format!("failed to open page: {e}")))?;
        self.page = Some(page.clone());

        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            self.extra_headers.clone(),
        )))
        .await
        .map_err(|e| ExtractionError::Render(format!("failed to set headers: {e}")))?;

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(self.viewport.0))
            .height(i64::from(self.viewport.1))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(ExtractionError::Render)?;
        page.execute(metrics)
            .await
            .map_err(|e| ExtractionError::Render(format!("failed to set viewport: {e}")))?;

        Ok(page)
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &Url) -> Result<(), ExtractionError> {
        let page = self.open_page().await?;

        let navigation = page
            .execute(NavigateParams::new(url.as_str()))
            .await
            .map_err(|e| ExtractionError::Navigation(e.to_string()))?;
        if let Some(error) = navigation.result.error_text.clone() {
            return Err(ExtractionError::Navigation(error));
        }

        // Evaluation fails while the old context is torn down; keep polling.
        loop {
            let ready = match page.evaluate(DOM_READY_SCRIPT).await {
                Ok(result) => result.into_value::<bool>().unwrap_or(false),
                Err(_) => false,
            };
            if ready {
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_body(&mut self) -> Result<(), ExtractionError> {
        let page = self.page()?;
        while page.find_element("body").await.is_err() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        Ok(())
    }

    async fn content(&mut self) -> Result<String, ExtractionError> {
        self.page()?
            .content()
            .await
            .map_err(|e| ExtractionError::Render(format!("failed to read content: {e}")))
    }

    async fn close(self: Box<Self>) {
        let mut session = self;

        if let Some(page) = session.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {e}");
            }
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, session.browser.close()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Failed to close browser: {e}"),
            Err(_) => warn!("Browser did not acknowledge close within {SHUTDOWN_GRACE:?}"),
        }

        if tokio::time::timeout(SHUTDOWN_GRACE, session.browser.wait())
            .await
            .is_err()
        {
            warn!("Browser process still running after close; killing on drop");
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // The browser's own drop kills the child process; the event loop must
        // be stopped explicitly or it outlives the session.
        self.handler.abort();
    }
}
