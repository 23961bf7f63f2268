//! complaint-server — Citizen complaint intake service
//!
//! Long-running service that:
//! - Accepts multipart complaint submissions with file attachments
//! - Persists complaints to a single PostgreSQL table (`pmc_data`)
//! - Serves a JWT-gated admin listing with absolute attachment URLs
//! - Serves stored attachments under `/uploads`

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod storage;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
