use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::ai::{extract::ExtractError, AiError};

pub const PARSE_FAILURE: &str = "Failed to parse AI response";

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed a presence check; no AI call was made.
    #[error("{0}")]
    BadRequest(String),

    /// Model output could not be recovered as JSON.
    #[error("failed to parse AI response: {reason}")]
    Parse { reason: String, raw: String },

    /// Any other failure on an AI-backed route.
    #[error("{context}: {message}")]
    Generation {
        context: &'static str,
        message: String,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn generation(context: &'static str, err: AiError) -> Self {
        Self::Generation {
            context,
            message: err.to_string(),
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        Self::Parse {
            reason: e.reason,
            raw: e.raw,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "rejected request");
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::Parse { reason, raw } => {
                tracing::error!(error = %reason, "failed to parse AI response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "error": PARSE_FAILURE,
                        "message": "Invalid JSON structure received",
                        "raw_response": raw,
                    }),
                )
            }
            ApiError::Generation { context, message } => {
                tracing::error!(error = %message, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": context, "message": message }),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
