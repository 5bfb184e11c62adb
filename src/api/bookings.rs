//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        booking::{Booking, CreateBooking},
        Page,
    },
    AppState,
};

use super::SharerUserId;

fn default_state() -> String {
    "ALL".to_string()
}

/// Listing filter, parsed case-insensitively
#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StateQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED (default: ALL)
    #[serde(default = "default_state")]
    pub state: String,
}

/// Owner's decision on a waiting booking
#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApprovalQuery {
    pub approved: bool,
}

/// Request a booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id")),
    request_body = CreateBooking,
    responses(
        (status = 200, description = "Booking created in WAITING status", body = Booking),
        (status = 400, description = "Bad time range or unavailable item", body = ErrorResponse),
        (status = 404, description = "User or item not found, or own item", body = ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(booking): Json<CreateBooking>,
) -> AppResult<Json<Booking>> {
    booking.validate()?;
    let created = state.services.bookings.add_booking(booking, user_id).await?;
    Ok(Json(created))
}

/// Approve or reject a waiting booking
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        ("id" = i64, Path, description = "Booking ID"),
        ApprovalQuery
    ),
    responses(
        (status = 200, description = "Booking decided", body = Booking),
        (status = 400, description = "Booking is no longer waiting", body = ErrorResponse),
        (status = 404, description = "Booking not found for this owner", body = ErrorResponse)
    )
)]
pub async fn approve_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(query): Query<ApprovalQuery>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .services
        .bookings
        .approve_booking(user_id, id, query.approved)
        .await?;
    Ok(Json(booking))
}

/// Get a booking visible to its booker or the item owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        ("id" = i64, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = Booking),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_booking(user_id, id).await?;
    Ok(Json(booking))
}

/// Bookings made by the caller
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id"), StateQuery, Page),
    responses(
        (status = 200, description = "Bookings, newest first", body = Vec<Booking>),
        (status = 400, description = "Unknown state", body = ErrorResponse)
    )
)]
pub async fn list_booker_bookings(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<StateQuery>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<Booking>>> {
    page.validate()?;
    let bookings = state
        .services
        .bookings
        .list_for_booker(user_id, &query.state, page)
        .await?;
    Ok(Json(bookings))
}

/// Bookings of items owned by the caller
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id"), StateQuery, Page),
    responses(
        (status = 200, description = "Bookings, newest first", body = Vec<Booking>),
        (status = 400, description = "Unknown state", body = ErrorResponse)
    )
)]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<StateQuery>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<Booking>>> {
    page.validate()?;
    let bookings = state
        .services
        .bookings
        .list_for_owner(user_id, &query.state, page)
        .await?;
    Ok(Json(bookings))
}
