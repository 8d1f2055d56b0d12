use sqlx::FromRow;

/// Numeric user identifier; every owned row references it.
pub type UserId = i64;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String, // Argon2 PHC string
}
