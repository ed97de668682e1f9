use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cv::analysis::AnalysisError;
use crate::jobs::board::JobBoardError;
use crate::llm_client::LlmError;
use crate::polling::PollError;
use crate::recommend::matching::MatchParseError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {message}")]
    Llm {
        message: String,
        upstream_body: Option<String>,
    },

    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        upstream_body: Option<String>,
    },

    #[error("Parse error: {message}")]
    Parse { message: String, raw: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

/// `Json` body extractor whose rejections use the `AppError` body instead of axum's
/// plain-text 4xx.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor with `AppError` rejections.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured(provider) => {
                AppError::NotConfigured(format!("{provider} API key is not set"))
            }
            LlmError::Api { status, message } => AppError::Llm {
                message: format!("LLM API returned status {status}"),
                upstream_body: Some(message),
            },
            other => AppError::Llm {
                message: other.to_string(),
                upstream_body: None,
            },
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NotJson { raw, reason } => AppError::Parse {
                message: format!("LLM reply is not valid JSON: {reason}"),
                raw,
            },
            AnalysisError::Schema { raw, reason } => AppError::Parse {
                message: format!("LLM reply does not match the CV schema: {reason}"),
                raw,
            },
            AnalysisError::Invalid(reason) => AppError::Parse {
                message: format!("CV analysis failed validation: {reason}"),
                raw: String::new(),
            },
        }
    }
}

impl From<MatchParseError> for AppError {
    fn from(err: MatchParseError) -> Self {
        let message = err.to_string();
        match err {
            MatchParseError::NoArray { raw } | MatchParseError::InvalidJson { raw, .. } => {
                AppError::Parse { message, raw }
            }
        }
    }
}

impl From<JobBoardError> for AppError {
    fn from(err: JobBoardError) -> Self {
        match err {
            JobBoardError::Status { status, body } => AppError::Upstream {
                message: format!("Job board returned status {status}"),
                upstream_body: Some(body),
            },
            other => AppError::Upstream {
                message: other.to_string(),
                upstream_body: None,
            },
        }
    }
}

impl From<PollError<StorageError>> for AppError {
    fn from(err: PollError<StorageError>) -> Self {
        match err {
            PollError::TimedOut { attempts, .. } => AppError::Timeout(format!(
                "Artifact not available after {attempts} attempts"
            )),
            PollError::Cancelled => AppError::Unavailable("Server is shutting down".to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotConfigured(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NOT_CONFIGURED",
                msg.clone(),
                None,
            ),
            AppError::Timeout(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                msg.clone(),
                None,
            ),
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                msg.clone(),
                None,
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Llm {
                message,
                upstream_body,
            } => {
                tracing::error!("LLM error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    message.clone(),
                    upstream_body.clone(),
                )
            }
            AppError::Upstream {
                message,
                upstream_body,
            } => {
                tracing::error!("Upstream error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    message.clone(),
                    upstream_body.clone(),
                )
            }
            AppError::Parse { message, raw } => {
                tracing::error!("Parse error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PARSE_ERROR",
                    message.clone(),
                    Some(raw.clone()).filter(|r| !r.is_empty()),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                    Some(msg.clone()),
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
        if let Some(details) = details {
            error["details"] = json!(details);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let response = AppError::validation("file is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "file is required");
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn test_parse_error_carries_raw_text() {
        let response = AppError::Parse {
            message: "not json".to_string(),
            raw: "Sure! Here is your data".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["details"], "Sure! Here is your data");
    }

    #[tokio::test]
    async fn test_llm_api_error_keeps_upstream_body() {
        let err: AppError = LlmError::Api {
            status: 401,
            message: "invalid api key".to_string(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert_eq!(body["error"]["details"], "invalid api key");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let err: AppError = LlmError::NotConfigured("OpenAI").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_json_rejection_maps_to_validation() {
        use axum::http::Request;

        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"other": 1}"#))
            .unwrap();
        type Fields = std::collections::HashMap<String, String>;
        let Err(rejection) = AppJson::<Fields>::from_request(request, &()).await else {
            panic!("expected the body to be rejected");
        };
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_poll_timeout_maps_to_timeout() {
        let err: AppError = PollError::<StorageError>::TimedOut {
            attempts: 3,
            last_error: None,
        }
        .into();
        assert!(matches!(err, AppError::Timeout(msg) if msg.contains('3')));
    }
}
