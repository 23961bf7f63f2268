//! Health check endpoint

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/status — reports the current datastore time, or a 500 when
/// the database is unreachable
pub async fn status(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Backend and database are running",
        "time": now,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
