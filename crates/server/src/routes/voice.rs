use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use crate::driver::GameDriver;
use crate::session::ChessContext;
use crate::voice::{TranscriptView, VoiceHub};

/// GET /api/voice/context
pub async fn get_context(Extension(driver): Extension<Arc<GameDriver>>) -> Json<ChessContext> {
    Json(driver.session().lock().await.chess_context())
}

/// GET /api/voice/transcript
pub async fn get_transcript(Extension(hub): Extension<VoiceHub>) -> Json<TranscriptView> {
    Json(hub.snapshot().await)
}

/// DELETE /api/voice/transcript
pub async fn clear_transcript(Extension(hub): Extension<VoiceHub>) -> StatusCode {
    hub.clear().await;
    StatusCode::NO_CONTENT
}
