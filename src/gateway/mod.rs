//! Validating gateway in front of the server tier
//!
//! Every route of the server is mirrored here. Bodies and query parameters
//! are checked first; only well-formed calls are forwarded.

pub mod client;

use axum::{
    extract::{Query, State},
    http::{Method, Uri},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{
    api::{
        bookings::{ApprovalQuery, StateQuery},
        health::HealthResponse,
        SharerUserId,
    },
    error::AppResult,
    models::{
        booking::{BookingState, CreateBooking},
        comment::CreateComment,
        item::{CreateItem, UpdateItem},
        request::CreateItemRequest,
        user::{CreateUser, UpdateUser},
        Page,
    },
};

pub use client::ServerClient;

/// Create the gateway router forwarding to `client`
pub fn create_router(client: ServerClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Users
        .route("/users", get(forward).post(create_user))
        .route("/users/:id", get(forward).patch(update_user).delete(forward))
        // Items
        .route("/items", get(paged).post(create_item))
        .route("/items/search", get(paged))
        .route("/items/:id", get(forward_as_user).patch(update_item))
        .route("/items/:id/comment", post(add_comment))
        // Bookings
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/owner", get(list_bookings))
        .route("/bookings/:id", get(forward_as_user).patch(approve_booking))
        // Item requests
        .route("/requests", get(forward_as_user).post(create_request))
        .route("/requests/all", get(paged))
        .route("/requests/:id", get(forward_as_user))
        .with_state(client)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn path_of(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Anonymous pass-through (user management)
async fn forward(
    State(client): State<ServerClient>,
    method: Method,
    uri: Uri,
) -> AppResult<Response> {
    client.send(method, path_of(&uri), None).await
}

async fn forward_as_user(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    method: Method,
    uri: Uri,
) -> AppResult<Response> {
    client.send(method, path_of(&uri), Some(user_id)).await
}

/// Pass-through for paginated listings
async fn paged(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    Query(page): Query<Page>,
    method: Method,
    uri: Uri,
) -> AppResult<Response> {
    page.validate()?;
    client.send(method, path_of(&uri), Some(user_id)).await
}

async fn create_user(
    State(client): State<ServerClient>,
    uri: Uri,
    Json(user): Json<CreateUser>,
) -> AppResult<Response> {
    user.validate()?;
    client.send_json(Method::POST, path_of(&uri), None, &user).await
}

async fn update_user(
    State(client): State<ServerClient>,
    uri: Uri,
    Json(patch): Json<UpdateUser>,
) -> AppResult<Response> {
    patch.validate()?;
    client.send_json(Method::PATCH, path_of(&uri), None, &patch).await
}

async fn create_item(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    uri: Uri,
    Json(item): Json<CreateItem>,
) -> AppResult<Response> {
    item.validate()?;
    client.send_json(Method::POST, path_of(&uri), Some(user_id), &item).await
}

async fn update_item(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    uri: Uri,
    Json(patch): Json<UpdateItem>,
) -> AppResult<Response> {
    client.send_json(Method::PATCH, path_of(&uri), Some(user_id), &patch).await
}

async fn add_comment(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    uri: Uri,
    Json(comment): Json<CreateComment>,
) -> AppResult<Response> {
    comment.validate()?;
    client.send_json(Method::POST, path_of(&uri), Some(user_id), &comment).await
}

async fn create_booking(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    uri: Uri,
    Json(booking): Json<CreateBooking>,
) -> AppResult<Response> {
    booking.validate()?;
    booking.check_not_past(Utc::now())?;
    client.send_json(Method::POST, path_of(&uri), Some(user_id), &booking).await
}

async fn approve_booking(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    Query(_): Query<ApprovalQuery>,
    uri: Uri,
) -> AppResult<Response> {
    client.send(Method::PATCH, path_of(&uri), Some(user_id)).await
}

/// Booker and owner listings; the state token never reaches the server unparsed
async fn list_bookings(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<StateQuery>,
    Query(page): Query<Page>,
    uri: Uri,
) -> AppResult<Response> {
    query.state.parse::<BookingState>()?;
    page.validate()?;
    client.send(Method::GET, path_of(&uri), Some(user_id)).await
}

async fn create_request(
    State(client): State<ServerClient>,
    SharerUserId(user_id): SharerUserId,
    uri: Uri,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<Response> {
    request.validate()?;
    client.send_json(Method::POST, path_of(&uri), Some(user_id), &request).await
}
