use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::jwt::JwtKeys;
use super::password::{spawn_hash, spawn_verify, DUMMY_HASH};
use super::repo::{DuplicateEmail, UserStore};
use super::repo_types::NewUser;
use crate::activity::ActivityLogger;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    InvalidInput,
    #[error("email already registered")]
    EmailExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("hashing error: {0}")]
    Hash(anyhow::Error),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("store error: {0}")]
    Store(anyhow::Error),
}

/// Admin login and registration.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityLogger>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, activity: Arc<dyn ActivityLogger>, keys: JwtKeys) -> Self {
        Self {
            users,
            activity,
            keys,
        }
    }

    /// Verifies credentials and issues a session token. Unknown email and wrong
    /// password both yield `InvalidCredentials`.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = match self.users.find_by_email(email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!("login unknown email");
                // keep the cost of this path equal to a wrong password
                let _ = spawn_verify(password.to_string(), DUMMY_HASH.to_string()).await;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "find_by_email failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match spawn_verify(password.to_string(), user.password_hash.clone()).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = user.id, "login invalid password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, user_id = user.id, "stored hash unreadable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let token = self.keys.sign(user.id, &user.email)?;
        self.log_event("admin_login", &user.email).await;
        info!(user_id = user.id, "admin logged in");
        Ok(token)
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<i64, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput);
        }

        match self.users.find_by_email(email).await {
            Ok(Some(_)) => {
                warn!("email already registered");
                return Err(AuthError::EmailExists);
            }
            Ok(None) => {}
            Err(e) => return Err(AuthError::Store(e)),
        }

        let password_hash = spawn_hash(password.to_string())
            .await
            .map_err(AuthError::Hash)?;
        let now = OffsetDateTime::now_utc();
        let id = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                created_at: now,
            })
            .await
            .map_err(|e| {
                if e.is::<DuplicateEmail>() {
                    AuthError::EmailExists
                } else {
                    AuthError::Store(e)
                }
            })?;

        self.log_event("admin_register", email).await;
        info!(user_id = id, "admin registered");
        Ok(id)
    }

    async fn log_event(&self, action: &str, detail: &str) {
        if let Err(e) = self
            .activity
            .record(action, detail, OffsetDateTime::now_utc())
            .await
        {
            warn!(error = %e, action, "activity log failed");
        }
    }
}
