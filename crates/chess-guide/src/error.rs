//! Guide error types

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuideError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Analysis API returned no text content")]
    EmptyResponse,

    #[error("Malformed analysis: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("Position error: {0}")]
    Position(#[from] chess_core::CoreError),
}
