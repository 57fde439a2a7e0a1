use std::path::PathBuf;
use std::time::Duration;

/// Desktop Chrome on Windows. Many job boards reject anything that does not look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Rendered traffic claims to come from a search results page.
pub const SEARCH_REFERER: &str = "https://www.google.com/";

/// Where the deploy hook installs Chromium on serverless hosts.
pub const BUNDLED_CHROME_PATH: &str = "/app/.cache/puppeteer/chrome/linux-stable/chrome-linux64/chrome";

/// Env vars whose presence marks a constrained serverless host.
const SERVERLESS_MARKERS: [&str; 3] = ["DYNO", "AWS_LAMBDA_FUNCTION_NAME", "VERCEL"];

/// Env vars that name a browser binary explicitly, in priority order.
const EXECUTABLE_OVERRIDES: [&str; 2] = ["CHROME_BIN", "CHROMIUM_PATH"];

/// Tunables for the extraction pipeline. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub accept: String,
    pub referer: String,

    /// Timeout for the direct GET in seconds (default: 20)
    pub fetch_timeout_secs: u64,

    /// Bound on navigation up to DOM content loaded, in seconds (default: 60)
    pub navigation_timeout_secs: u64,

    /// Bound on waiting for a `body` element after navigation, in seconds (default: 30)
    pub body_timeout_secs: u64,

    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Browser binary. `None` lets chromiumoxide search PATH.
    pub chrome_executable: Option<PathBuf>,

    pub readability: ReadabilityOptions,
}

/// Knobs passed to the readability stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadabilityOptions {
    /// Minimum characters for a candidate block to count as article content (default: 500)
    pub char_threshold: usize,

    /// Keep elements whose class/id/role looks like boilerplate instead of pruning them.
    pub keep_unlikely_candidates: bool,

    /// Drop embedded `<xml>` islands before parsing.
    pub strip_xml_islands: bool,
}

impl Default for ReadabilityOptions {
    fn default() -> Self {
        Self {
            char_threshold: 500,
            keep_unlikely_candidates: true,
            strip_xml_islands: true,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            accept: BROWSER_ACCEPT.to_string(),
            referer: SEARCH_REFERER.to_string(),
            fetch_timeout_secs: 20,
            navigation_timeout_secs: 60,
            body_timeout_secs: 30,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_executable: None,
            readability: ReadabilityOptions::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_secs(self.body_timeout_secs)
    }
}

/// Picks the browser binary from the environment.
///
/// An explicit override always wins. Serverless hosts without one get the bundled
/// install path; conventional servers fall back to PATH discovery (`None`).
pub fn resolve_chrome_executable<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = EXECUTABLE_OVERRIDES
        .iter()
        .filter_map(|key| lookup(*key))
        .find(|value| !value.trim().is_empty());

    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    let serverless = SERVERLESS_MARKERS.iter().any(|key| lookup(*key).is_some());
    serverless.then(|| PathBuf::from(BUNDLED_CHROME_PATH))
}
