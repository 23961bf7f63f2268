//! Database access layer

pub mod admins;
pub mod complaints;

use sqlx::PgPool;

/// Apply the idempotent schema bootstrap (CREATE TABLE IF NOT EXISTS).
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../schema.sql"))
        .execute(pool)
        .await?;
    Ok(())
}
