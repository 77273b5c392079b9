pub mod extract;
pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// A base64 image sent inline alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub const DEFAULT_MIME: &'static str = "image/jpeg";

    /// Accepts raw base64 or a data URL. Everything up to and including the
    /// first comma is dropped; the MIME type comes from a `data:<mime>;` header.
    pub fn from_client_payload(payload: &str) -> Self {
        match payload.split_once(',') {
            Some((header, data)) => {
                let mime_type = header
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(Self::DEFAULT_MIME);
                Self {
                    mime_type: mime_type.to_string(),
                    data: data.to_string(),
                }
            }
            None => Self {
                mime_type: Self::DEFAULT_MIME.to_string(),
                data: payload.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("request to AI provider failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("AI provider did not answer within {0}s")]
    Timeout(u64),

    #[error("AI provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("AI provider returned no text content")]
    EmptyResponse,
}

impl From<reqwest::Error> for AiError {
    /// The request URL is dropped so it never reaches logs or clients.
    fn from(e: reqwest::Error) -> Self {
        AiError::Transport(e.without_url())
    }
}

impl AiError {
    /// Transport failures, timeouts, throttling and provider-side 5xx are retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::Transport(_) | AiError::Timeout(_) => true,
            AiError::Provider { status, .. } => *status == 429 || *status >= 500,
            AiError::EmptyResponse => false,
        }
    }
}

/// Text generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<String, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_prefix_is_stripped() {
        let img = InlineImage::from_client_payload("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.data, "iVBORw0KGgo=");
    }

    #[test]
    fn bare_base64_defaults_to_jpeg() {
        let img = InlineImage::from_client_payload("/9j/4AAQSkZJRg==");
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.data, "/9j/4AAQSkZJRg==");
    }

    #[test]
    fn only_first_comma_is_a_separator() {
        let img = InlineImage::from_client_payload("garbage,abc,def");
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.data, "abc,def");
    }

    #[test]
    fn retry_classification() {
        assert!(AiError::Timeout(5).is_retryable());
        assert!(AiError::Provider { status: 503, message: "x".into() }.is_retryable());
        assert!(AiError::Provider { status: 429, message: "x".into() }.is_retryable());
        assert!(!AiError::Provider { status: 400, message: "x".into() }.is_retryable());
        assert!(!AiError::EmptyResponse.is_retryable());
    }
}
