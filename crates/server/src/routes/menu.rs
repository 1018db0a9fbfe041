use std::sync::Arc;

use axum::{Extension, Json};
use serde::Deserialize;

use chess_core::{GameMode, PlayerColor};

use crate::driver::GameDriver;
use crate::error::AppError;
use crate::session::SessionView;

#[derive(Deserialize)]
pub struct ModeRequest {
    pub mode: GameMode,
}

#[derive(Deserialize)]
pub struct ColorRequest {
    pub color: PlayerColor,
}

/// POST /api/menu/mode
pub async fn select_mode(
    Extension(driver): Extension<Arc<GameDriver>>,
    Json(body): Json<ModeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = driver.session().lock().await;
    session.select_mode(body.mode)?;
    Ok(Json(session.view()))
}

/// POST /api/menu/color
pub async fn select_color(
    Extension(driver): Extension<Arc<GameDriver>>,
    Json(body): Json<ColorRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = driver.session().lock().await;
    session.select_color(body.color)?;
    // the engine opens when the human plays black
    driver.schedule(&mut session);
    Ok(Json(session.view()))
}

/// POST /api/menu/back
pub async fn back_to_menu(
    Extension(driver): Extension<Arc<GameDriver>>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = driver.session().lock().await;
    session.back_to_menu()?;
    Ok(Json(session.view()))
}
