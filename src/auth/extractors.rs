use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Guard for admin-only routes: passes when the request carries
/// `Authorization: Bearer <token>` with a valid, unexpired token.
pub struct AdminToken;

#[async_trait]
impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let rejected = ApiError::unauthorized("unauthorized");

        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(rejected)?;

        let token = auth
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or(rejected)?;

        let keys = JwtKeys::from_ref(state);
        if !keys.is_valid(token) {
            warn!("invalid or expired token");
            return Err(rejected);
        }
        Ok(AdminToken)
    }
}
