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
use crate::features::vehicles::dtos::{
    ensure_rental_window, AvailableVehicleDto, CreateVehicleBookingDto, UpdateVehicleBookingDto,
    UpdateVehicleStatusDto, VehicleAvailabilityQuery, VehicleBookingResponseDto,
};
use crate::features::vehicles::services::VehicleService;
use crate::shared::status::BookingStatus;
use crate::shared::types::{message_only, ApiResponse, OwnerQuery};

/// List all vehicle bookings (admin)
#[utoipa::path(
    get,
    path = "/api/vehicles",
    responses(
        (status = 200, description = "Bookings retrieved successfully", body = ApiResponse<Vec<VehicleBookingResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn list_bookings(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<VehicleService>>,
) -> Result<Json<ApiResponse<Vec<VehicleBookingResponseDto>>>> {
    let bookings = service.list_all().await?;
    Ok(Json(ApiResponse::success(
        Some(bookings),
        Some("Bookings retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking retrieved successfully", body = ApiResponse<VehicleBookingResponseDto>),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn get_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<VehicleService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VehicleBookingResponseDto>>> {
    let booking = service.get_by_id(id).await?;
    user.ensure_can_access(booking.user_id)?;

    Ok(Json(ApiResponse::success(
        Some(booking),
        Some("Booking retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/user/{user_id}",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User bookings retrieved successfully", body = ApiResponse<Vec<VehicleBookingResponseDto>>),
        (status = 403, description = "Not allowed to view this user's bookings")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn list_user_bookings(
    user: AuthenticatedUser,
    State(service): State<Arc<VehicleService>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<VehicleBookingResponseDto>>>> {
    user.ensure_can_access(user_id)?;

    let bookings = service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(bookings),
        Some("User bookings retrieved successfully".to_string()),
    )))
}

/// Book a vehicle
#[utoipa::path(
    post,
    path = "/api/vehicles",
    params(OwnerQuery),
    request_body = CreateVehicleBookingDto,
    responses(
        (status = 201, description = "Booking created successfully", body = ApiResponse<VehicleBookingResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn create_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<VehicleService>>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(dto): AppJson<CreateVehicleBookingDto>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleBookingResponseDto>>)> {
    let owner_id = user.resolve_owner(owner.user_id)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    ensure_rental_window(dto.pickup_date, dto.drop_date)?;

    let booking = service.create(owner_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(booking),
            Some("Booking created successfully".to_string()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateVehicleBookingDto,
    responses(
        (status = 200, description = "Booking updated successfully", body = ApiResponse<VehicleBookingResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn update_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<VehicleService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateVehicleBookingDto>,
) -> Result<Json<ApiResponse<VehicleBookingResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    ensure_rental_window(dto.pickup_date, dto.drop_date)?;
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    let booking = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(booking),
        Some("Booking updated successfully".to_string()),
    )))
}

/// Update booking status and driver assignment (admin)
#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}/status",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateVehicleStatusDto,
    responses(
        (status = 200, description = "Booking status updated successfully", body = ApiResponse<VehicleBookingResponseDto>),
        (status = 400, description = "Invalid status or driver details"),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn update_booking_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<VehicleService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateVehicleStatusDto>,
) -> Result<Json<ApiResponse<VehicleBookingResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(booking),
        Some("Booking status updated successfully".to_string()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted successfully"),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn delete_booking(
    user: AuthenticatedUser,
    State(service): State<Arc<VehicleService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    if !user.is_admin() {
        user.ensure_can_access(service.owner_of(id).await?)?;
    }

    if !service.delete(id).await? {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    Ok(Json(message_only("Booking deleted successfully")))
}

/// Vehicles free over a rental window (public)
#[utoipa::path(
    get,
    path = "/api/vehicles/available",
    params(VehicleAvailabilityQuery),
    responses(
        (status = 200, description = "Available vehicles retrieved successfully", body = ApiResponse<Vec<AvailableVehicleDto>>),
        (status = 400, description = "Missing or invalid dates")
    ),
    tag = "vehicles"
)]
pub async fn list_available_vehicles(
    State(service): State<Arc<VehicleService>>,
    AppQuery(query): AppQuery<VehicleAvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<AvailableVehicleDto>>>> {
    ensure_rental_window(query.pickup_date, query.drop_date)?;

    let vehicles = service
        .list_available(query.pickup_date, query.drop_date)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(vehicles),
        Some("Available vehicles retrieved successfully".to_string()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/status/{status}",
    params(("status" = String, Path, description = "Status name (case-insensitive) or code")),
    responses(
        (status = 200, description = "Bookings retrieved successfully", body = ApiResponse<Vec<VehicleBookingResponseDto>>),
        (status = 400, description = "Invalid status")
    ),
    security(("bearer_auth" = [])),
    tag = "vehicles"
)]
pub async fn list_bookings_by_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<VehicleService>>,
    Path(status): Path<String>,
) -> Result<Json<ApiResponse<Vec<VehicleBookingResponseDto>>>> {
    let status = status.parse::<BookingStatus>().map_err(AppError::BadRequest)?;

    let bookings = service.list_by_status(status).await?;
    Ok(Json(ApiResponse::success(
        Some(bookings),
        Some("Bookings retrieved successfully".to_string()),
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::vehicles::{routes, VehicleService};
    use crate::shared::test_helpers::{lazy_pool, with_admin_auth, with_customer_auth};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn protected_server(admin: bool) -> TestServer {
        let router = routes::routes(Arc::new(VehicleService::new(lazy_pool())));
        let router = if admin {
            with_admin_auth(router)
        } else {
            with_customer_auth(router)
        };
        TestServer::new(router).unwrap()
    }

    fn public_server() -> TestServer {
        let router = routes::public_routes(Arc::new(VehicleService::new(lazy_pool())));
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_window() {
        let response = protected_server(false)
            .post("/api/vehicles")
            .json(&json!({
                "vehicleType": "SUV",
                "pickupDate": "2026-11-05T09:00:00Z",
                "dropDate": "2026-11-01T09:00:00Z"
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(
            body["errors"][0],
            "Pickup date must be on or before drop date"
        );
    }

    #[tokio::test]
    async fn test_availability_requires_both_dates() {
        let response = public_server()
            .get("/api/vehicles/available")
            .add_query_param("pickupDate", "2026-11-01T09:00:00Z")
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Invalid query parameters"));
    }

    #[tokio::test]
    async fn test_availability_rejects_inverted_window() {
        public_server()
            .get("/api/vehicles/available")
            .add_query_param("pickupDate", "2026-11-05T09:00:00Z")
            .add_query_param("dropDate", "2026-11-01T09:00:00Z")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_customer_cannot_list_all() {
        protected_server(false)
            .get("/api/vehicles")
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_invalid_status_filter() {
        let response = protected_server(true).get("/api/vehicles/status/Lost").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid status: Lost");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_missing_booking_is_not_found(pool: sqlx::PgPool) {
        let router = with_admin_auth(routes::routes(Arc::new(VehicleService::new(pool))));
        let response = TestServer::new(router).unwrap().delete("/api/vehicles/9999").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Booking not found");
    }
}
