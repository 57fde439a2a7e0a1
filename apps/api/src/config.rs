use std::str::FromStr;

use anyhow::{Context, Result};

use crate::extraction::config::{resolve_chrome_executable, ExtractionConfig};

const DEFAULT_LLM_BASE_URL: &str = "https://api.together.xyz/v1";
const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free";

/// Application configuration loaded from environment variables.
/// Everything has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent keys leave extraction working; `/generate` then answers 500.
    pub together_api_key: Option<String>,
    pub llm_base_url: String,
    pub together_model: String,
    pub extraction: ExtractionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ExtractionConfig::default();

        let mut extraction = ExtractionConfig {
            fetch_timeout_secs: parse_or(&lookup, "FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,
            navigation_timeout_secs: parse_or(
                &lookup,
                "NAVIGATION_TIMEOUT_SECS",
                defaults.navigation_timeout_secs,
            )?,
            body_timeout_secs: parse_or(&lookup, "BODY_TIMEOUT_SECS", defaults.body_timeout_secs)?,
            chrome_executable: resolve_chrome_executable(&lookup),
            ..defaults
        };
        extraction.readability.char_threshold = parse_or(
            &lookup,
            "CHAR_THRESHOLD",
            extraction.readability.char_threshold,
        )?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            together_api_key: lookup("TOGETHER_API_KEY").filter(|k| !k.trim().is_empty()),
            llm_base_url: lookup("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            together_model: lookup("TOGETHER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            extraction,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
