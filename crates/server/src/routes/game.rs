use std::sync::Arc;

use axum::{http::header, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};

use chess_guide::PanelView;

use crate::driver::GameDriver;
use crate::error::AppError;
use crate::session::{GameSession, InputOutcome, LogLine, SessionView};

#[derive(Deserialize)]
pub struct ClickRequest {
    pub square: String,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub uci: String,
}

#[derive(Deserialize)]
pub struct PromotionRequest {
    /// `q`, `r`, `b` or `n`
    pub piece: char,
}

#[derive(Serialize)]
pub struct InputResponse {
    pub outcome: InputOutcome,
    pub session: SessionView,
}

fn respond(
    driver: &Arc<GameDriver>,
    session: &mut GameSession,
    outcome: InputOutcome,
) -> Json<InputResponse> {
    if outcome.moved() {
        driver.schedule(session);
    }
    Json(InputResponse {
        outcome,
        session: session.view(),
    })
}

/// GET /api/session
pub async fn get_session(Extension(driver): Extension<Arc<GameDriver>>) -> Json<SessionView> {
    Json(driver.session().lock().await.view())
}

/// POST /api/game/back
pub async fn back_to_color_selection(
    Extension(driver): Extension<Arc<GameDriver>>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = driver.session().lock().await;
    session.back_to_color_selection()?;
    Ok(Json(session.view()))
}

/// POST /api/game/click
pub async fn click(
    Extension(driver): Extension<Arc<GameDriver>>,
    Json(body): Json<ClickRequest>,
) -> Result<Json<InputResponse>, AppError> {
    let mut session = driver.session().lock().await;
    let outcome = session.click(&body.square)?;
    Ok(respond(&driver, &mut session, outcome))
}

/// POST /api/game/move
pub async fn submit_move(
    Extension(driver): Extension<Arc<GameDriver>>,
    Json(body): Json<MoveRequest>,
) -> Result<Json<InputResponse>, AppError> {
    let mut session = driver.session().lock().await;
    let outcome = session.submit_uci(&body.uci)?;
    Ok(respond(&driver, &mut session, outcome))
}

/// POST /api/game/promotion
pub async fn choose_promotion(
    Extension(driver): Extension<Arc<GameDriver>>,
    Json(body): Json<PromotionRequest>,
) -> Json<InputResponse> {
    let mut session = driver.session().lock().await;
    let outcome = session.choose_promotion(body.piece);
    respond(&driver, &mut session, outcome)
}

/// DELETE /api/game/promotion
///
/// Close the promotion choice without moving.
pub async fn cancel_promotion(
    Extension(driver): Extension<Arc<GameDriver>>,
) -> Json<SessionView> {
    let mut session = driver.session().lock().await;
    if session.cancel_promotion() {
        tracing::debug!("Promotion cancelled");
    }
    Json(session.view())
}

/// POST /api/game/reset
pub async fn reset(Extension(driver): Extension<Arc<GameDriver>>) -> Json<SessionView> {
    let mut session = driver.session().lock().await;
    session.reset();
    driver.schedule(&mut session);
    Json(session.view())
}

/// GET /api/game/log
pub async fn get_log(Extension(driver): Extension<Arc<GameDriver>>) -> Json<Vec<LogLine>> {
    Json(driver.session().lock().await.log_lines())
}

/// GET /api/game/analysis
pub async fn get_analysis(Extension(driver): Extension<Arc<GameDriver>>) -> Json<PanelView> {
    Json(driver.session().lock().await.analysis_view())
}

/// GET /api/game/pgn
pub async fn get_pgn(Extension(driver): Extension<Arc<GameDriver>>) -> impl IntoResponse {
    let pgn = driver.session().lock().await.pgn();
    ([(header::CONTENT_TYPE, "application/x-chess-pgn")], pgn)
}
