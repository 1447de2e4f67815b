use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::CreateServiceRequest;
use super::repo_types::{NewService, Service};
use crate::{
    auth::{dto::IdResponse, extractors::AdminToken},
    error::ApiError,
    state::AppState,
};

/// Every catalog route requires an admin token.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_active_services).post(create_service))
        .route("/services/:id", delete(delete_service))
}

#[instrument(skip(state, _admin, payload))]
pub async fn create_service(
    _admin: AdminToken,
    State(state): State<AppState>,
    payload: Result<Json<CreateServiceRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "service body rejected");
        ApiError::bad_request("invalid_body")
    })?;

    let id = state
        .catalog
        .create(NewService {
            name: body.name,
            price: body.price,
            is_active: body.is_active,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "create service failed");
            ApiError::internal("create_failed")
        })?;

    Ok(Json(IdResponse { id }))
}

#[instrument(skip(state, _admin, id))]
pub async fn delete_service(
    _admin: AdminToken,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request("invalid_id"))?;

    state.catalog.delete(id).await.map_err(|e| {
        error!(error = %e, service_id = id, "delete service failed");
        ApiError::internal("delete_failed")
    })?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, _admin))]
pub async fn list_active_services(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let items = state.catalog.list_active().await.map_err(|e| {
        error!(error = %e, "list services failed");
        ApiError::internal("list_failed")
    })?;
    Ok(Json(items))
}
