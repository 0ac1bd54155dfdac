use sqlx::FromRow;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,                     // unique user ID
    pub username: String,             // case-sensitive, unique
    pub password_hash: String,        // Argon2 hash
    pub is_admin: bool,
    pub created_at: String,           // "D/M/YY h:mm AM/PM"
}

/// Shared code that lets its holder register. Never consumed.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationCode {
    pub id: Uuid,
    pub code: String,
    pub created_at: String,
}
