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
use crate::features::tickets::dtos::{SaveTicketDto, TicketResponseDto, UpdateTicketStatusDto};
use crate::features::tickets::services::TicketService;
use crate::shared::status::BookingStatus;
use crate::shared::types::{message_only, ApiResponse, OwnerQuery};

/// List all ticket requests (admin)
#[utoipa::path(
    get,
    path = "/api/tickets",
    responses(
        (status = 200, description = "Tickets retrieved successfully", body = ApiResponse<Vec<TicketResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn list_tickets(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<TicketService>>,
) -> Result<Json<ApiResponse<Vec<TicketResponseDto>>>> {
    let tickets = service.list_all().await?;
    Ok(Json(ApiResponse::success(
        Some(tickets),
        Some("Tickets retrieved successfully".to_string()),
    )))
}

/// Get ticket by ID
#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket retrieved successfully", body = ApiResponse<TicketResponseDto>),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn get_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TicketResponseDto>>> {
    let ticket = service.get_by_id(id).await?;
    user.ensure_can_access(ticket.user_id)?;

    Ok(Json(ApiResponse::success(
        Some(ticket),
        Some("Ticket retrieved successfully".to_string()),
    )))
}

/// List a user's ticket requests
#[utoipa::path(
    get,
    path = "/api/tickets/user/{user_id}",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User tickets retrieved successfully", body = ApiResponse<Vec<TicketResponseDto>>),
        (status = 403, description = "Not allowed to view this user's tickets")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn list_user_tickets(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<TicketResponseDto>>>> {
    user.ensure_can_access(user_id)?;

    let tickets = service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(tickets),
        Some("User tickets retrieved successfully".to_string()),
    )))
}

/// Create a ticket request
#[utoipa::path(
    post,
    path = "/api/tickets",
    params(OwnerQuery),
    request_body = SaveTicketDto,
    responses(
        (status = 201, description = "Ticket created successfully", body = ApiResponse<TicketResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn create_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(dto): AppJson<SaveTicketDto>,
) -> Result<(StatusCode, Json<ApiResponse<TicketResponseDto>>)> {
    let owner_id = user.resolve_owner(owner.user_id)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service.create(owner_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ticket),
            Some("Ticket created successfully".to_string()),
        )),
    ))
}

/// Update a ticket request
#[utoipa::path(
    put,
    path = "/api/tickets/{id}",
    params(("id" = i32, Path, description = "Ticket ID")),
    request_body = SaveTicketDto,
    responses(
        (status = 200, description = "Ticket updated successfully", body = ApiResponse<TicketResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn update_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<SaveTicketDto>,
) -> Result<Json<ApiResponse<TicketResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    let ticket = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ticket),
        Some("Ticket updated successfully".to_string()),
    )))
}

/// Update ticket status (admin)
#[utoipa::path(
    patch,
    path = "/api/tickets/{id}/status",
    params(("id" = i32, Path, description = "Ticket ID")),
    request_body = UpdateTicketStatusDto,
    responses(
        (status = 200, description = "Ticket status updated successfully", body = ApiResponse<TicketResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn update_ticket_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateTicketStatusDto>,
) -> Result<Json<ApiResponse<TicketResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ticket),
        Some("Ticket status updated successfully".to_string()),
    )))
}

/// Delete a ticket request
#[utoipa::path(
    delete,
    path = "/api/tickets/{id}",
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket deleted successfully"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn delete_ticket(
    user: AuthenticatedUser,
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    if !service.delete(id).await? {
        return Err(AppError::NotFound("Ticket not found".to_string()));
    }
    Ok(Json(message_only("Ticket deleted successfully")))
}

/// List ticket requests in a given status (admin)
#[utoipa::path(
    get,
    path = "/api/tickets/status/{status}",
    params(("status" = String, Path, description = "Status name (case-insensitive) or code")),
    responses(
        (status = 200, description = "Tickets retrieved successfully", body = ApiResponse<Vec<TicketResponseDto>>),
        (status = 400, description = "Invalid status")
    ),
    security(("bearer_auth" = [])),
    tag = "tickets"
)]
pub async fn list_tickets_by_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<TicketService>>,
    Path(status): Path<String>,
) -> Result<Json<ApiResponse<Vec<TicketResponseDto>>>> {
    let status = status.parse::<BookingStatus>().map_err(AppError::BadRequest)?;

    let tickets = service.list_by_status(status).await?;
    Ok(Json(ApiResponse::success(
        Some(tickets),
        Some("Tickets retrieved successfully".to_string()),
    )))
}
