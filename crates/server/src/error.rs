use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_core::CoreError;
use serde_json::json;

use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
            CoreError::InvalidFen { .. } | CoreError::InvalidSquare(_) => {
                AppError::BadRequest(e.to_string())
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Core(core) => core.into(),
            SessionError::FeatureDisabled(_) => AppError::Unavailable(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Unavailable(msg) => {
                tracing::warn!("Feature unavailable: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
