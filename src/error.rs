use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::plant_id::PlantIdError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload too large: max {0}MB allowed")]
    UploadTooLarge(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] PlantIdError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::UploadTooLarge(max) => {
                tracing::warn!("Upload too large: max {}MB allowed", max);
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Upload too large: max {}MB allowed", max),
                )
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Upstream(e) => {
                tracing::error!("Plant.id request failed: {}", e);
                if e.is_timeout() {
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        "plant identification timed out".to_string(),
                    )
                } else {
                    (
                        StatusCode::BAD_GATEWAY,
                        "plant identification failed".to_string(),
                    )
                }
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        // Return JSON error response for API compatibility
        (status, Json(json!({ "error": message }))).into_response()
    }
}
