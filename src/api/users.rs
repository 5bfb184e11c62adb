//! User management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::{AppResult, ErrorResponse},
    models::user::{CreateUser, UpdateUser, User},
    AppState,
};

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users ordered by id", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<CreateUser>,
) -> AppResult<Json<User>> {
    user.validate()?;
    let created = state.services.users.create_user(user).await?;
    Ok(Json(created))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    patch.validate()?;
    let updated = state.services.users.update_user(id, patch).await?;
    Ok(Json(updated))
}

/// Delete a user; unknown ids succeed
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted")
    )
)]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<()> {
    state.services.users.delete_user(id).await
}
