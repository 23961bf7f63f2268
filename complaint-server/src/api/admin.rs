//! Admin authentication endpoint

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth;
use crate::db::admins;
use crate::error::{ApiResult, AppError};
use crate::state::AppState;

/// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}

/// Compare a supplied password against the stored argon2 PHC hash.
/// A hash that fails to parse counts as a mismatch, not an error.
fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = req.username.trim();
    let admin = admins::find_by_username(&state.pool, username)
        .await?
        // Distinct message tells the caller whether the username exists.
        .ok_or_else(|| AppError::Auth("Invalid username".into()))?;

    if !verify_password(&req.password, &admin.password_hash) {
        return Err(AppError::Auth("Incorrect password".into()));
    }

    let token = auth::create_token(&admin.id.to_string(), &admin.username, &state.jwt_secret)
        .map_err(AppError::internal)?;

    tracing::info!(username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
    }))
}
