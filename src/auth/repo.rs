use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::repo_types::{NewUser, User};

/// Raised by a store when the email is already taken at insert time.
#[derive(Debug, Error)]
#[error("email already registered")]
pub struct DuplicateEmail;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    /// Create a new user with an already hashed password.
    async fn create(&self, user: NewUser) -> anyhow::Result<i64> {
        let res = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(DuplicateEmail.into()),
            Err(e) => Err(anyhow::Error::new(e).context("insert user")),
        }
    }
}

pub mod memory {
    use super::*;
    use tokio::sync::Mutex;

    /// In-memory user store for tests and local runs.
    #[derive(Default)]
    pub struct MemoryUserStore {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            let users = self.users.lock().await;
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn create(&self, user: NewUser) -> anyhow::Result<i64> {
            let mut users = self.users.lock().await;
            if users.iter().any(|u| u.email == user.email) {
                return Err(DuplicateEmail.into());
            }
            let id = users.len() as i64 + 1;
            users.push(User {
                id,
                email: user.email,
                password_hash: user.password_hash,
                created_at: user.created_at,
            });
            Ok(id)
        }
    }
}
