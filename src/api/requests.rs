//! Item request endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        request::{CreateItemRequest, ItemRequest, ItemRequestWithItems},
        Page,
    },
    AppState,
};

use super::SharerUserId;

/// Ask for an item nobody lists yet
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id")),
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Request created", body = ItemRequest),
        (status = 400, description = "Blank description", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<Json<ItemRequest>> {
    request.validate()?;
    let created = state.services.requests.add_request(user_id, request).await?;
    Ok(Json(created))
}

/// The caller's own requests with the items offered in answer
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id")),
    responses(
        (status = 200, description = "Own requests, newest first", body = Vec<ItemRequestWithItems>)
    )
)]
pub async fn list_own_requests(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemRequestWithItems>>> {
    let requests = state.services.requests.list_own(user_id).await?;
    Ok(Json(requests))
}

/// Requests from everybody else
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id"), Page),
    responses(
        (
            status = 200,
            description = "Other users' requests, newest first",
            body = Vec<ItemRequestWithItems>
        )
    )
)]
pub async fn list_other_requests(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<ItemRequestWithItems>>> {
    page.validate()?;
    let requests = state.services.requests.list_others(user_id, page).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        ("id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request with offered items", body = ItemRequestWithItems),
        (status = 404, description = "Request or user not found", body = ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestWithItems>> {
    let request = state.services.requests.get_request(user_id, id).await?;
    Ok(Json(request))
}
