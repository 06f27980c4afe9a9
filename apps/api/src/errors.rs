use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assistant::AssistantError;
use crate::config::ConfigError;
use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The model server could not be reached or answered badly.
    /// `fallback` carries offline guidance the caller may show instead.
    #[error("Assistant unavailable: {source}")]
    AssistantUnavailable {
        source: AssistantError,
        fallback: Option<String>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn assistant(source: AssistantError, fallback: impl Into<String>) -> Self {
        AppError::AssistantUnavailable {
            source,
            fallback: Some(fallback.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fallback) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Extraction(e) => {
                tracing::warn!("Extraction failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    e.user_message(),
                    None,
                )
            }
            AppError::InvalidConfiguration(e) => (
                StatusCode::BAD_REQUEST,
                "INVALID_CONFIGURATION",
                e.to_string(),
                None,
            ),
            AppError::AssistantUnavailable { source, fallback } => {
                tracing::warn!("Assistant unavailable: {source}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ASSISTANT_UNAVAILABLE",
                    "The AI assistant is unavailable. Scoring results are unaffected; make sure the model server is running.".to_string(),
                    fallback.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(fallback) = fallback {
            error["fallback"] = json!(fallback);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_maps_to_422() {
        let response = AppError::from(ExtractionError::NoTextFound).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_bad_weights_map_to_400() {
        let response = AppError::from(ConfigError::WeightsSum(99)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_assistant_maps_to_503() {
        let response = AppError::assistant(AssistantError::EmptyResponse, "tip").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
