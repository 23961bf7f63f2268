use sqlx::PgPool;

/// Admin credential row — managed by an external identity store,
/// read-only from this service.
#[derive(sqlx::FromRow)]
pub struct AdminUser {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AdminUser>, sqlx::Error> {
    sqlx::query_as("SELECT id, username, password_hash FROM admin_users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}
