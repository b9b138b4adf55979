//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use gas_inference_core::PredictionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad request data (missing field, invalid input, missing columns)
    #[error("{0}")]
    ValidationError(String),

    /// Regression model not loaded
    #[error("{0}")]
    ModelUnavailable(String),

    /// Model failed at run time, worker panicked, ...
    #[error("{0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Prediction model unavailable")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            e if e.is_client_error() => AppError::ValidationError(e.to_string()),
            PredictionError::ModelUnavailable(msg) => AppError::ModelUnavailable(msg),
            e => AppError::InternalError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("prediction worker failed: {}", err))
    }
}
