//! Admin JWT authentication for the gated listing API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// JWT claims for admin authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin ID
    pub sub: String,
    /// Admin username
    pub username: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin identity extracted from JWT
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: String,
    pub username: String,
}

/// Token validity window
const JWT_EXPIRY_HOURS: i64 = 2;

/// Create a JWT token for an admin
pub fn create_token(
    admin_id: &str,
    username: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_with_expiry(admin_id, username, secret, chrono::Duration::hours(JWT_EXPIRY_HOURS))
}

/// Create a token with an explicit validity window.
///
/// Production callers go through [`create_token`]; this is exposed so
/// tests can mint already-expired tokens with a negative window.
pub fn create_token_with_expiry(
    admin_id: &str,
    username: &str,
    secret: &str,
    expires_in: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = AdminClaims {
        sub: admin_id.to_string(),
        username: username.to_string(),
        exp: (now + expires_in).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that extracts and verifies the admin JWT from the
/// Authorization header. Failing requests never reach the handler.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::Unauthorized("Invalid token".into())
    })?;

    let identity = AdminIdentity {
        admin_id: token_data.claims.sub,
        username: token_data.claims.username,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-at-least-32-bytes-long!!";

    #[test]
    fn token_round_trip() {
        let token = create_token("7", "asha", SECRET).expect("token creation failed");

        let data = jsonwebtoken::decode::<AdminClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .expect("decode failed");

        assert_eq!(data.claims.sub, "7");
        assert_eq!(data.claims.username, "asha");
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token =
            create_token_with_expiry("7", "asha", SECRET, chrono::Duration::hours(-1))
                .expect("token creation failed");

        let err = jsonwebtoken::decode::<AdminClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .expect_err("expired token must not validate");
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("7", "asha", SECRET).expect("token creation failed");

        jsonwebtoken::decode::<AdminClaims>(
            &token,
            &DecodingKey::from_secret(b"another-secret-also-32-bytes-long!!!"),
            &Validation::default(),
        )
        .expect_err("tampered secret must not validate");
    }
}
