use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, message) = match self {
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.to_string(),
                    "An unexpected error occurred. Check service logs for details.",
                )
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    "Check that all required environment variables are set",
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, "Invalid request"),
            AppError::Network(err) => {
                tracing::warn!("Network error: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Network error".to_string(),
                    "Unable to connect to external services. Please try again.",
                )
            }
            AppError::ExternalApi(msg) => {
                tracing::warn!("External API error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg, "An upstream service returned an error")
            }
            AppError::MalformedResponse(msg) => {
                tracing::warn!("Malformed model response: {}", msg);
                (StatusCode::BAD_GATEWAY, msg, "The language model returned an unusable response")
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
            "message": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
