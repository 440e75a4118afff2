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
use crate::features::labor_approvals::dtos::{
    CalculateFeeQuery, CreateLaborApprovalDto, FeeBreakdownDto, LaborApprovalPaymentDto,
    LaborApprovalResponseDto, UpdateLaborApprovalStatusDto,
};
use crate::features::labor_approvals::services::{fee_calculator, LaborApprovalService};
use crate::shared::types::{message_only, ApiResponse, OwnerQuery};

/// List all labor approval applications (admin)
#[utoipa::path(
    get,
    path = "/api/laborapprovals",
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<LaborApprovalResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn list_applications(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<LaborApprovalService>>,
) -> Result<Json<ApiResponse<Vec<LaborApprovalResponseDto>>>> {
    let applications = service.list_all().await?;
    Ok(Json(ApiResponse::success(
        Some(applications),
        Some("Applications retrieved successfully".to_string()),
    )))
}

/// List the caller's own applications
#[utoipa::path(
    get,
    path = "/api/laborapprovals/my-applications",
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<LaborApprovalResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn my_applications(
    user: AuthenticatedUser,
    State(service): State<Arc<LaborApprovalService>>,
) -> Result<Json<ApiResponse<Vec<LaborApprovalResponseDto>>>> {
    let applications = service.list_by_user(user.user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(applications),
        Some("Applications retrieved successfully".to_string()),
    )))
}

/// Get application by ID (owner or admin)
#[utoipa::path(
    get,
    path = "/api/laborapprovals/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application retrieved successfully", body = ApiResponse<LaborApprovalResponseDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn get_application(
    user: AuthenticatedUser,
    State(service): State<Arc<LaborApprovalService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<LaborApprovalResponseDto>>> {
    let application = service.get_by_id(id).await?;
    user.ensure_can_access(application.user_id)?;

    Ok(Json(ApiResponse::success(
        Some(application),
        Some("Application retrieved successfully".to_string()),
    )))
}

/// Submit a labor approval application; the fee is computed and stored
#[utoipa::path(
    post,
    path = "/api/laborapprovals",
    params(OwnerQuery),
    request_body = CreateLaborApprovalDto,
    responses(
        (status = 201, description = "Application submitted successfully", body = ApiResponse<LaborApprovalResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn create_application(
    user: AuthenticatedUser,
    State(service): State<Arc<LaborApprovalService>>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(dto): AppJson<CreateLaborApprovalDto>,
) -> Result<(StatusCode, Json<ApiResponse<LaborApprovalResponseDto>>)> {
    let owner_id = user.resolve_owner(owner.user_id)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let application = service.create(owner_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(application),
            Some("Application submitted successfully".to_string()),
        )),
    ))
}

/// Update application status (admin)
#[utoipa::path(
    put,
    path = "/api/laborapprovals/{id}/status",
    params(("id" = i32, Path, description = "Application ID")),
    request_body = UpdateLaborApprovalStatusDto,
    responses(
        (status = 200, description = "Status updated successfully", body = ApiResponse<LaborApprovalResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<LaborApprovalService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateLaborApprovalStatusDto>,
) -> Result<Json<ApiResponse<LaborApprovalResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let application = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(application),
        Some("Status updated successfully".to_string()),
    )))
}

/// Pay the application fee (owner or admin)
#[utoipa::path(
    post,
    path = "/api/laborapprovals/{id}/payment",
    params(("id" = i32, Path, description = "Application ID")),
    request_body = LaborApprovalPaymentDto,
    responses(
        (status = 200, description = "Payment processed successfully", body = ApiResponse<LaborApprovalResponseDto>),
        (status = 400, description = "Payment already processed or insufficient amount"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn process_payment(
    user: AuthenticatedUser,
    State(service): State<Arc<LaborApprovalService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<LaborApprovalPaymentDto>,
) -> Result<Json<ApiResponse<LaborApprovalResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let application = service.process_payment(id, &user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(application),
        Some("Payment processed successfully".to_string()),
    )))
}

/// Preview the fee for a destination, job category and salary
#[utoipa::path(
    get,
    path = "/api/laborapprovals/calculate-fee",
    params(CalculateFeeQuery),
    responses(
        (status = 200, description = "Fee calculated successfully", body = ApiResponse<FeeBreakdownDto>),
        (status = 400, description = "Missing or invalid query parameters")
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn calculate_fee(
    AppQuery(query): AppQuery<CalculateFeeQuery>,
) -> Result<Json<ApiResponse<FeeBreakdownDto>>> {
    let fee = fee_calculator::calculate_fee(&query.country, &query.job_category, query.salary);
    Ok(Json(ApiResponse::success(
        Some(fee),
        Some("Fee calculated successfully".to_string()),
    )))
}

/// Delete application (admin)
#[utoipa::path(
    delete,
    path = "/api/laborapprovals/{id}",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application deleted successfully"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "labor-approvals"
)]
pub async fn delete_application(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<LaborApprovalService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    if !service.delete(id).await? {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    Ok(Json(message_only("Application deleted successfully")))
}
