use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateUserDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::{message_only, ApiResponse};

/// List all users (admin)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = service.list_all().await?;
    Ok(Json(ApiResponse::success(
        Some(users),
        Some("Users retrieved successfully".to_string()),
    )))
}

/// Get user by ID (self or admin)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponseDto>),
        (status = 403, description = "Not allowed to view this user"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    user.ensure_can_access(id)?;

    let found = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(
        Some(found),
        Some("User retrieved successfully".to_string()),
    )))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user_by_email(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let found = service.get_by_email(&email).await?;
    user.ensure_can_access(found.id)?;

    Ok(Json(ApiResponse::success(
        Some(found),
        Some("User retrieved successfully".to_string()),
    )))
}

/// Update user profile (self or admin)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    user.ensure_can_access(id)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(updated),
        Some("User updated successfully".to_string()),
    )))
}

/// Delete user and everything they own (admin)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    if !service.delete(id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(message_only("User deleted successfully")))
}

/// Check whether an email is still available for registration
#[utoipa::path(
    get,
    path = "/api/users/check-email/{email}",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "Availability of the email", body = ApiResponse<bool>)
    ),
    tag = "users"
)]
pub async fn check_email(
    State(service): State<Arc<UserService>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<bool>>> {
    let available = service.is_email_available(&email).await?;
    let message = if available {
        "Email is available"
    } else {
        "Email is already in use"
    };
    Ok(Json(ApiResponse::success(
        Some(available),
        Some(message.to_string()),
    )))
}
