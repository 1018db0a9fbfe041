use axum::{Extension, Json};
use serde_json::{json, Value as JsonValue};

use crate::config::{Config, Features};

/// GET /health
pub async fn health_check() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/features
pub async fn features(Extension(config): Extension<Config>) -> Json<Features> {
    Json(config.features())
}
