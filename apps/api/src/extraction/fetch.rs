//! Direct HTTP retrieval — the cheap first attempt before any browser is involved.

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::extraction::config::ExtractionConfig;

/// Why a direct fetch did not produce a document. Every variant sends the
/// pipeline to the headless fallback; none of them reaches the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(u16),
}

/// Retrieves raw HTML for a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// reqwest-backed fetcher sending browser-like headers.
///
/// Holds one `Client` for the lifetime of the process; it carries no
/// per-request state and is shared by all concurrent extractions.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
    accept_language: String,
}

impl HttpFetcher {
    pub fn new(config: &ExtractionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.fetch_timeout()).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ExtractionConfig) -> Self {
        Self {
            client,
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        // Error pages (403 bot walls, 404 shells) are worth a rendered retry.
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_fetcher(config: &ExtractionConfig) -> HttpFetcher {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpFetcher::with_client(client, config)
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_fetch_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = local_fetcher(&ExtractionConfig::default());
        let url = Url::parse(&format!("http://127.0.0.1:{port}/job")).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_fetch_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().route(
            "/job",
            axum::routing::get(|| async { (axum::http::StatusCode::FORBIDDEN, "blocked") }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let fetcher = local_fetcher(&ExtractionConfig::default());
        let url = Url::parse(&format!("http://{addr}/job")).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(403)));
    }

    #[tokio::test]
    async fn test_sends_browser_headers() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().route(
            "/job",
            axum::routing::get(|headers: axum::http::HeaderMap| async move {
                let ua = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let lang = headers
                    .get("accept-language")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("{ua}|{lang}")
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ExtractionConfig::default();
        let fetcher = local_fetcher(&config);
        let url = Url::parse(&format!("http://{addr}/job")).unwrap();

        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, format!("{}|{}", config.user_agent, config.accept_language));
    }
}
