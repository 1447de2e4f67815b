use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::{error, instrument, warn};

use super::dto::{CreateBookingRequest, ListParams};
use super::repo_types::Booking;
use super::services::{BookingInput, DashboardStats};
use crate::{
    auth::{dto::IdResponse, extractors::AdminToken},
    error::ApiError,
    state::AppState,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/admin/dashboard", get(dashboard))
}

fn parse_booking_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

#[instrument(skip(state, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "booking body rejected");
        ApiError::bad_request("invalid_body")
    })?;

    let booking_date =
        parse_booking_date(&body.booking_date).ok_or(ApiError::bad_request("invalid_date"))?;

    let id = state
        .bookings
        .create(BookingInput {
            customer_name: body.customer_name,
            customer_phone: body.customer_phone,
            service_id: body.service_id,
            booking_date,
            booking_time: body.booking_time,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "create booking failed");
            ApiError::internal("create_failed")
        })?;

    Ok(Json(IdResponse { id }))
}

#[instrument(skip(state))]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let params = ListParams::from_pairs(pairs);
    let items = state
        .bookings
        .list_latest(params.limit())
        .await
        .map_err(|e| {
            error!(error = %e, "list bookings failed");
            ApiError::internal("list_failed")
        })?;
    Ok(Json(items))
}

#[instrument(skip(state, _admin))]
pub async fn dashboard(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state
        .bookings
        .dashboard(OffsetDateTime::now_utc())
        .await
        .map_err(|e| {
            error!(error = %e, "dashboard stats failed");
            ApiError::internal("stats_failed")
        })?;
    Ok(Json(stats))
}
