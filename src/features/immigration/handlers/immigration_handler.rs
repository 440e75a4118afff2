use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::immigration::dtos::{
    ImmigrationApplicationResponseDto, SaveImmigrationApplicationDto, UpdateApplicationStatusDto,
};
use crate::features::immigration::models::ApplicationStatus;
use crate::features::immigration::services::ImmigrationService;
use crate::shared::types::{message_only, ApiResponse, OwnerQuery};

/// List all immigration applications (admin)
#[utoipa::path(
    get,
    path = "/api/immigration",
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<ImmigrationApplicationResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn list_applications(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ImmigrationService>>,
) -> Result<Json<ApiResponse<Vec<ImmigrationApplicationResponseDto>>>> {
    let applications = service.list_all().await?;
    Ok(Json(ApiResponse::success(
        Some(applications),
        Some("Applications retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/immigration/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application retrieved successfully", body = ApiResponse<ImmigrationApplicationResponseDto>),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn get_application(
    user: AuthenticatedUser,
    State(service): State<Arc<ImmigrationService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ImmigrationApplicationResponseDto>>> {
    let application = service.get_by_id(id).await?;
    user.ensure_can_access(application.user_id)?;

    Ok(Json(ApiResponse::success(
        Some(application),
        Some("Application retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/immigration/user/{user_id}",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User applications retrieved successfully", body = ApiResponse<Vec<ImmigrationApplicationResponseDto>>),
        (status = 403, description = "Not allowed to view this user's applications")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn list_user_applications(
    user: AuthenticatedUser,
    State(service): State<Arc<ImmigrationService>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ImmigrationApplicationResponseDto>>>> {
    user.ensure_can_access(user_id)?;

    let applications = service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(applications),
        Some("User applications retrieved successfully".to_string()),
    )))
}

/// Submit a visa application
#[utoipa::path(
    post,
    path = "/api/immigration",
    params(OwnerQuery),
    request_body = SaveImmigrationApplicationDto,
    responses(
        (status = 201, description = "Application created successfully", body = ApiResponse<ImmigrationApplicationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Passport number already used")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn create_application(
    user: AuthenticatedUser,
    State(service): State<Arc<ImmigrationService>>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(dto): AppJson<SaveImmigrationApplicationDto>,
) -> Result<(StatusCode, Json<ApiResponse<ImmigrationApplicationResponseDto>>)> {
    let owner_id = user.resolve_owner(owner.user_id)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let application = service.create(owner_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(application),
            Some("Application created successfully".to_string()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/immigration/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    request_body = SaveImmigrationApplicationDto,
    responses(
        (status = 200, description = "Application updated successfully", body = ApiResponse<ImmigrationApplicationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Passport number already used")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn update_application(
    user: AuthenticatedUser,
    State(service): State<Arc<ImmigrationService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<SaveImmigrationApplicationDto>,
) -> Result<Json<ApiResponse<ImmigrationApplicationResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    let application = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(application),
        Some("Application updated successfully".to_string()),
    )))
}

/// Record a review decision (admin)
#[utoipa::path(
    patch,
    path = "/api/immigration/{id}/status",
    params(("id" = i32, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusDto,
    responses(
        (status = 200, description = "Application status updated successfully", body = ApiResponse<ImmigrationApplicationResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn update_application_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ImmigrationService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateApplicationStatusDto>,
) -> Result<Json<ApiResponse<ImmigrationApplicationResponseDto>>> {
    let application = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(application),
        Some("Application status updated successfully".to_string()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/immigration/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application deleted successfully"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn delete_application(
    user: AuthenticatedUser,
    State(service): State<Arc<ImmigrationService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    if !service.delete(id).await? {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    Ok(Json(message_only("Application deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/immigration/status/{status}",
    params(("status" = String, Path, description = "Status name (case-insensitive) or code")),
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<ImmigrationApplicationResponseDto>>),
        (status = 400, description = "Invalid status")
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn list_applications_by_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ImmigrationService>>,
    Path(status): Path<String>,
) -> Result<Json<ApiResponse<Vec<ImmigrationApplicationResponseDto>>>> {
    let status = status
        .parse::<ApplicationStatus>()
        .map_err(AppError::BadRequest)?;

    let applications = service.list_by_status(status).await?;
    Ok(Json(ApiResponse::success(
        Some(applications),
        Some("Applications retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/immigration/country/{country}",
    params(("country" = String, Path, description = "Case-insensitive part of the target country")),
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<ImmigrationApplicationResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "immigration"
)]
pub async fn list_applications_by_country(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ImmigrationService>>,
    Path(country): Path<String>,
) -> Result<Json<ApiResponse<Vec<ImmigrationApplicationResponseDto>>>> {
    let applications = service.list_by_country(&country).await?;
    Ok(Json(ApiResponse::success(
        Some(applications),
        Some("Applications retrieved successfully".to_string()),
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::immigration::{routes::routes, ImmigrationService};
    use crate::shared::test_helpers::{lazy_pool, with_admin_auth, with_customer_auth};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn server(admin: bool) -> TestServer {
        let router = routes(Arc::new(ImmigrationService::new(lazy_pool())));
        let router = if admin {
            with_admin_auth(router)
        } else {
            with_customer_auth(router)
        };
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_customer_cannot_filter_by_country() {
        server(false)
            .get("/api/immigration/country/canada")
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_invalid_status_filter() {
        let response = server(true).get("/api/immigration/status/Expired").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid status: Expired");
    }

    #[tokio::test]
    async fn test_status_code_out_of_range_is_rejected() {
        server(true)
            .patch("/api/immigration/1/status")
            .json(&json!({ "status": 9 }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_customer_cannot_create_for_someone_else() {
        server(false)
            .post("/api/immigration")
            .add_query_param("userId", 42)
            .json(&json!({
                "fullName": "Sita Sharma",
                "passportNumber": "PA7654321",
                "targetCountry": "Canada",
                "passportExpiryDate": "2031-03-01T00:00:00Z"
            }))
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_blank_passport_is_rejected() {
        server(false)
            .post("/api/immigration")
            .json(&json!({
                "fullName": "Sita Sharma",
                "passportNumber": "",
                "targetCountry": "Canada",
                "passportExpiryDate": "2031-03-01T00:00:00Z"
            }))
            .await
            .assert_status_bad_request();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_missing_application_is_not_found(pool: sqlx::PgPool) {
        let router = with_admin_auth(routes(Arc::new(ImmigrationService::new(pool))));
        let response = TestServer::new(router).unwrap().delete("/api/immigration/9999").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Application not found");
    }
}
