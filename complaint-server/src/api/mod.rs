//! API routes for complaint-server

pub mod admin;
pub mod complaints;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth_middleware;
use crate::state::AppState;

/// Body limit sized for a submission with 5 attachments
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Admin listing (JWT gated)
    let gated = Router::new()
        .route("/api/admin/complaints", get(complaints::list_complaints))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    // Public intake (no auth)
    let public = Router::new()
        .route("/api/complaints", post(complaints::submit_complaint))
        .route("/api/admin/login", post(admin::login))
        .route("/api/status", get(health::status));

    Router::new()
        .merge(public)
        .merge(gated)
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
