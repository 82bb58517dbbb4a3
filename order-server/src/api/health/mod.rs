//! Health check API

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - liveness plus a database round trip
async fn health(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(json!({
        "status": "ok",
        "database": "ok",
    })))
}
