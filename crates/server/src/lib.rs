//! HTTP and WebSocket surface for the chess buddy: menu flow, board input,
//! engine replies, guided analysis and the voice transcript.

pub mod config;
pub mod driver;
pub mod error;
pub mod routes;
pub mod session;
pub mod voice;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::driver::GameDriver;
use crate::voice::VoiceHub;

pub fn build_router(config: Config, driver: Arc<GameDriver>, hub: VoiceHub) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        .route("/api/features", get(routes::health::features))
        // Menu
        .route("/api/session", get(routes::game::get_session))
        .route("/api/menu/mode", post(routes::menu::select_mode))
        .route("/api/menu/color", post(routes::menu::select_color))
        .route("/api/menu/back", post(routes::menu::back_to_menu))
        // Game
        .route("/api/game/back", post(routes::game::back_to_color_selection))
        .route("/api/game/click", post(routes::game::click))
        .route("/api/game/move", post(routes::game::submit_move))
        .route(
            "/api/game/promotion",
            post(routes::game::choose_promotion).delete(routes::game::cancel_promotion),
        )
        .route("/api/game/reset", post(routes::game::reset))
        .route("/api/game/log", get(routes::game::get_log))
        .route("/api/game/analysis", get(routes::game::get_analysis))
        .route("/api/game/pgn", get(routes::game::get_pgn))
        // Voice
        .route("/api/voice/context", get(routes::voice::get_context))
        .route(
            "/api/voice/transcript",
            get(routes::voice::get_transcript).delete(routes::voice::clear_transcript),
        )
        .route("/ws/voice", get(routes::voice_ws::ws_handler))
        // Shared state
        .layer(Extension(driver))
        .layer(Extension(hub))
        .layer(Extension(config))
        .layer(cors)
}
