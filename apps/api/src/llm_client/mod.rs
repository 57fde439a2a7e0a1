/// LLM Client — the single point of entry for all chat-completion calls.
///
/// Talks to an OpenAI-compatible `/chat/completions` endpoint (Together by
/// default) and hands back the raw server-sent-event byte stream. There is no
/// retry: a failed call surfaces to the caller, who can simply resubmit.
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 200;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No API key configured")]
    MissingApiKey,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Shared chat-completion client. Built once at startup; immutable afterwards.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    default_model: String,
}

impl LlmClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        default_model: String,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
        model: Option<&'a str>,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: model.unwrap_or(&self.default_model),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: true,
        }
    }

    /// Starts a streaming completion and returns the upstream body as-is.
    pub async fn stream_chat(
        &self,
        system: &str,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<BoxStream<'static, Result<Bytes, reqwest::Error>>, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let request_body = self.build_request(system, prompt, model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("LLM stream opened: model={}", request_body.model);
        Ok(response.bytes_stream().boxed())
    }
}
