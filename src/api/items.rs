//! Item catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        comment::{Comment, CreateComment},
        item::{CreateItem, Item, ItemDetails, UpdateItem},
        Page,
    },
    AppState,
};

use super::SharerUserId;

/// Free-text search query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Matched case-insensitively against name and description
    #[serde(default)]
    pub text: String,
}

/// List the caller's items with booking hints and comments
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id"), Page),
    responses(
        (status = 200, description = "Owner's items", body = Vec<ItemDetails>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<ItemDetails>>> {
    page.validate()?;
    let items = state.services.items.get_items_by_owner(user_id, page).await?;
    Ok(Json(items))
}

/// Get item details
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_item(id, user_id).await?;
    Ok(Json(item))
}

/// List a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id")),
    request_body = CreateItem,
    responses(
        (status = 200, description = "Item created", body = Item),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Owner or request not found", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(item): Json<CreateItem>,
) -> AppResult<Json<Item>> {
    item.validate()?;
    let created = state.services.items.add_item(user_id, item).await?;
    Ok(Json(created))
}

/// Partially update an item owned by the caller
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found or not owned", body = ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    let updated = state.services.items.update_item(user_id, id, patch).await?;
    Ok(Json(updated))
}

/// Search available items
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id"), SearchQuery, Page),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>)
    )
)]
pub async fn search_items(
    State(state): State<AppState>,
    SharerUserId(_user_id): SharerUserId,
    Query(query): Query<SearchQuery>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<Item>>> {
    page.validate()?;
    let items = state.services.items.search(&query.text, page).await?;
    Ok(Json(items))
}

/// Comment on an item after a finished booking
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment added", body = Comment),
        (status = 400, description = "No finished booking or blank text", body = ErrorResponse),
        (status = 404, description = "Item or user not found", body = ErrorResponse)
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(comment): Json<CreateComment>,
) -> AppResult<Json<Comment>> {
    comment.validate()?;
    let created = state.services.items.add_comment(id, user_id, comment).await?;
    Ok(Json(created))
}
