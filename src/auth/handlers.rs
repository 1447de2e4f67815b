use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::{CredentialsRequest, IdResponse, TokenResponse};
use super::services::AuthError;
use crate::{error::ApiError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/admin/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "login body rejected");
        ApiError::bad_request("invalid_body")
    })?;

    let token = state
        .auth
        .login(&body.email, &body.password)
        .await
        .map_err(|_| ApiError::unauthorized("invalid_credentials"))?;

    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "register body rejected");
        ApiError::bad_request("invalid_body")
    })?;

    match state.auth.register(&body.email, &body.password).await {
        Ok(id) => Ok(Json(IdResponse { id })),
        Err(AuthError::EmailExists) => Err(ApiError::conflict("email_exists")),
        Err(e) => {
            error!(error = %e, "register failed");
            Err(ApiError::bad_request("register_failed"))
        }
    }
}
