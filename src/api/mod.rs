//! API handlers for ShareIt REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Header carrying the caller's user id
pub const SHARER_USER_ID: &str = "X-Sharer-User-Id";

/// Caller identity taken from the `X-Sharer-User-Id` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerUserId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SharerUserId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SHARER_USER_ID)
            .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", SHARER_USER_ID)))?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(SharerUserId)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {} header", SHARER_USER_ID)))
    }
}

/// Create the server router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Items
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/search", get(items::search_items))
        .route("/items/:id", get(items::get_item).patch(items::update_item))
        .route("/items/:id/comment", post(items::add_comment))
        // Bookings
        .route(
            "/bookings",
            get(bookings::list_booker_bookings).post(bookings::create_booking),
        )
        .route("/bookings/owner", get(bookings::list_owner_bookings))
        .route(
            "/bookings/:id",
            get(bookings::get_booking).patch(bookings::approve_booking),
        )
        // Item requests
        .route(
            "/requests",
            get(requests::list_own_requests).post(requests::create_request),
        )
        .route("/requests/all", get(requests::list_other_requests))
        .route("/requests/:id", get(requests::get_request))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
