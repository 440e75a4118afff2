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
use crate::features::hotels::dtos::{
    HotelBookingResponseDto, HotelSearchQuery, SaveHotelBookingDto, UpdateHotelStatusDto,
};
use crate::features::hotels::services::HotelService;
use crate::shared::types::{message_only, ApiResponse, OwnerQuery};

/// List all hotel bookings (admin)
#[utoipa::path(
    get,
    path = "/api/hotels",
    responses(
        (status = 200, description = "Hotel bookings retrieved successfully", body = ApiResponse<Vec<HotelBookingResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn list_bookings(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<HotelService>>,
) -> Result<Json<ApiResponse<Vec<HotelBookingResponseDto>>>> {
    let bookings = service.list_all().await?;
    Ok(Json(ApiResponse::success(
        Some(bookings),
        Some("Hotel bookings retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/hotels/{id}",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Hotel booking retrieved successfully", body = ApiResponse<HotelBookingResponseDto>),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn get_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<HotelService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<HotelBookingResponseDto>>> {
    let booking = service.get_by_id(id).await?;
    user.ensure_can_access(booking.user_id)?;

    Ok(Json(ApiResponse::success(
        Some(booking),
        Some("Hotel booking retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/hotels/user/{user_id}",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User hotel bookings retrieved successfully", body = ApiResponse<Vec<HotelBookingResponseDto>>),
        (status = 403, description = "Not allowed to view this user's bookings")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn list_user_bookings(
    user: AuthenticatedUser,
    State(service): State<Arc<HotelService>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<HotelBookingResponseDto>>>> {
    user.ensure_can_access(user_id)?;

    let bookings = service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(bookings),
        Some("User hotel bookings retrieved successfully".to_string()),
    )))
}

/// Search bookings by location, stay window and party size
#[utoipa::path(
    get,
    path = "/api/hotels/search",
    params(HotelSearchQuery),
    responses(
        (status = 200, description = "Hotels found", body = ApiResponse<Vec<HotelBookingResponseDto>>),
        (status = 400, description = "Missing or invalid query parameters")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn search_hotels(
    _user: AuthenticatedUser,
    State(service): State<Arc<HotelService>>,
    AppQuery(query): AppQuery<HotelSearchQuery>,
) -> Result<Json<ApiResponse<Vec<HotelBookingResponseDto>>>> {
    let hotels = service.search(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(hotels),
        Some("Hotels found".to_string()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/hotels",
    params(OwnerQuery),
    request_body = SaveHotelBookingDto,
    responses(
        (status = 201, description = "Hotel booking created successfully", body = ApiResponse<HotelBookingResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn create_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<HotelService>>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(dto): AppJson<SaveHotelBookingDto>,
) -> Result<(StatusCode, Json<ApiResponse<HotelBookingResponseDto>>)> {
    let owner_id = user.resolve_owner(owner.user_id)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = service.create(owner_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(booking),
            Some("Hotel booking created successfully".to_string()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/hotels/{id}",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = SaveHotelBookingDto,
    responses(
        (status = 200, description = "Hotel booking updated successfully", body = ApiResponse<HotelBookingResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn update_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<HotelService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<SaveHotelBookingDto>,
) -> Result<Json<ApiResponse<HotelBookingResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    dto.validate_stay()?;
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    let booking = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(booking),
        Some("Hotel booking updated successfully".to_string()),
    )))
}

/// Update booking status, price and notes (admin)
#[utoipa::path(
    put,
    path = "/api/hotels/{id}/status",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateHotelStatusDto,
    responses(
        (status = 200, description = "Hotel booking status updated successfully", body = ApiResponse<HotelBookingResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn update_booking_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<HotelService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateHotelStatusDto>,
) -> Result<Json<ApiResponse<HotelBookingResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(booking),
        Some("Hotel booking status updated successfully".to_string()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/hotels/{id}",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Hotel booking deleted successfully"),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "hotels"
)]
pub async fn delete_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<HotelService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    if !service.delete(id).await? {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    Ok(Json(message_only("Hotel booking deleted successfully")))
}
