//! Application state for complaint-server

use std::path::PathBuf;

use sqlx::PgPool;

use crate::config::Config;
use crate::{BoxError, db};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Directory where attachment files are written
    pub upload_dir: PathBuf,
    /// Base URL prefixed onto stored relative attachment paths
    pub public_base_url: String,
    /// JWT secret for the admin gate
    pub jwt_secret: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        db::ensure_schema(&pool).await?;

        let upload_dir = PathBuf::from(&config.upload_dir);
        tokio::fs::create_dir_all(&upload_dir).await?;

        Ok(Self {
            pool,
            upload_dir,
            public_base_url: config.public_base_url.clone(),
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
