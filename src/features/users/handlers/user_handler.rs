use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto};
use crate::features::users::models::User;
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users ordered by name", body = ApiResponse<Vec<User>>)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = service.list().await?;
    Ok(Json(ApiResponse::listing(users)))
}

/// Active fixers a defect can be assigned to
#[utoipa::path(
    get,
    path = "/api/users/assignees",
    responses(
        (status = 200, description = "Assignable users", body = ApiResponse<Vec<User>>)
    ),
    tag = "users"
)]
pub async fn list_assignees(
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = service.list_assignees().await?;
    Ok(Json(ApiResponse::listing(users)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<User>),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<User>>> {
    let user = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Validation error")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(user),
            Some("User registered".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UpdateUserDto,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<User>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("User updated".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted".to_string()),
        None,
    )))
}
