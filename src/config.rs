use std::fmt;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub max_concurrency: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_GEMINI_API_URL.into(),
            model: DEFAULT_GEMINI_MODEL.into(),
            timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
            max_concurrency: 8,
        }
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = AiConfig::default();
        let ai = AiConfig {
            api_key: std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY is missing in the environment variables")?,
            api_url: std::env::var("GEMINI_API_URL").unwrap_or(defaults.api_url),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            timeout_secs: env_or("AI_TIMEOUT_SECS", defaults.timeout_secs),
            max_retries: env_or("AI_MAX_RETRIES", defaults.max_retries),
            retry_backoff_ms: env_or("AI_RETRY_BACKOFF_MS", defaults.retry_backoff_ms),
            max_concurrency: env_or("AI_MAX_CONCURRENCY", defaults.max_concurrency).max(1),
        };
        anyhow::ensure!(
            !ai.api_key.trim().is_empty(),
            "GEMINI_API_KEY is missing in the environment variables"
        );

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            ai,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
