use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{ChangePasswordRequestDto, LoginRequestDto, LoginResponseDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::features::users::dtos::{CreateUserDto, UserResponseDto};
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(user),
            Some("User registered successfully".to_string()),
        )),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Login successful".to_string()),
    )))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequestDto,
    responses(
        (status = 200, description = "Password changed successfully"),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn change_password(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ChangePasswordRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.change_password(user.user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Password changed successfully".to_string()),
    )))
}

#[cfg(test)]
mod tests {
    use crate::core::config::AuthConfig;
    use crate::features::auth::routes::{protected_routes, public_routes};
    use crate::features::auth::{AuthService, TokenService};
    use crate::features::users::UserService;
    use crate::shared::test_helpers::{lazy_pool, with_customer_auth};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> Arc<AuthService> {
        let config = AuthConfig {
            jwt_secret: "handler-test-secret-long-enough-to-sign".to_string(),
            issuer: "alfa-travels".to_string(),
            audience: "alfa-travels-web".to_string(),
            token_ttl: Duration::from_secs(600),
            jwt_leeway: Duration::from_secs(0),
        };
        Arc::new(AuthService::new(
            Arc::new(UserService::new(lazy_pool())),
            Arc::new(TokenService::new(&config)),
        ))
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_and_short_password() {
        let server = TestServer::new(public_routes(service())).unwrap();
        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "fullName": "Ram Bahadur",
                "email": "ram-at-example",
                "password": "abc"
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("Invalid email format"));
        assert!(message.contains("Password must be at least 6 characters"));
    }

    #[tokio::test]
    async fn test_login_requires_password() {
        let server = TestServer::new(public_routes(service())).unwrap();
        server
            .post("/api/auth/login")
            .json(&json!({ "email": "customer@alfatravels.com", "password": "" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_change_password_requires_identity() {
        let server = TestServer::new(protected_routes(service())).unwrap();
        server
            .post("/api/auth/change-password")
            .json(&json!({ "currentPassword": "old-secret", "newPassword": "new-secret" }))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_change_password_enforces_minimum_length() {
        let server = TestServer::new(with_customer_auth(protected_routes(service()))).unwrap();
        server
            .post("/api/auth/change-password")
            .json(&json!({ "currentPassword": "old-secret", "newPassword": "123" }))
            .await
            .assert_status_bad_request();
    }
}
