use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, error, instrument, warn};

use super::{AiError, Generator, InlineImage};
use crate::config::AiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: Blob<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProviderError,
}

/// Gemini `generateContent` over REST.
pub struct GeminiClient {
    client: Client,
    config: AiConfig,
    permits: Semaphore,
}

impl GeminiClient {
    pub fn new(config: AiConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build().context("build http client")?;
        let permits = Semaphore::new(config.max_concurrency.max(1));
        tracing::info!(
            model = %config.model,
            max_concurrency = config.max_concurrency,
            timeout_secs = config.timeout_secs,
            "gemini client ready"
        );
        Ok(Self {
            client,
            config,
            permits,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(10);
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(factor))
    }

    #[instrument(skip(self, body), fields(model = %self.config.model))]
    async fn send(&self, body: &GenerateRequest<'_>) -> Result<String, AiError> {
        let mut attempt = 0;
        loop {
            match self.send_once(body).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let wait = self.backoff(attempt);
                    attempt += 1;
                    warn!(error = %e, attempt, wait_ms = wait.as_millis() as u64, "AI call failed; retrying");
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    error!(error = %e, attempts = attempt + 1, "AI call failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(&self, body: &GenerateRequest<'_>) -> Result<String, AiError> {
        let _permit = self.permits.acquire().await.map_err(|_| AiError::Provider {
            status: 503,
            message: "client is shutting down".into(),
        })?;

        let call = async {
            let response = self
                .client
                .post(self.endpoint())
                .header(API_KEY_HEADER, &self.config.api_key)
                .json(body)
                .send()
                .await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, AiError>((status, text))
        };
        let (status, text) = tokio::time::timeout(Duration::from_secs(self.config.timeout_secs), call)
            .await
            .map_err(|_| AiError::Timeout(self.config.timeout_secs))??;

        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &text));
        }
        debug!(bytes = text.len(), "AI response received");
        extract_text(&text)
    }
}

fn provider_error(status: u16, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    AiError::Provider { status, message }
}

fn extract_text(body: &str) -> Result<String, AiError> {
    let parsed: GenerateResponse = serde_json::from_str(body).map_err(|e| AiError::Provider {
        status: 502,
        message: format!("unreadable provider response: {e}"),
    })?;

    if let Some(err) = parsed.error {
        return Err(AiError::Provider {
            status: err.code.unwrap_or(500),
            message: err.message,
        });
    }

    parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .map(|t| t.trim().to_string())
        .ok_or(AiError::EmptyResponse)
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::Text { text: prompt }],
            }],
        };
        self.send(&body).await
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<String, AiError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::Inline {
                        inline_data: Blob {
                            mime_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                ],
            }],
        };
        self.send(&body).await
    }
}
