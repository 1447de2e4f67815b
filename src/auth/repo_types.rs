use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Admin user record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // never exposed in JSON
    pub created_at: OffsetDateTime,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}
