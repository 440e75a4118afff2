use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::vehicles::handlers;
use crate::features::vehicles::services::VehicleService;

/// Public vehicle routes (no authentication required)
pub fn public_routes(service: Arc<VehicleService>) -> Router {
    Router::new()
        .route(
            "/api/vehicles/available",
            get(handlers::list_available_vehicles),
        )
        .with_state(service)
}

/// Protected vehicle routes
pub fn routes(service: Arc<VehicleService>) -> Router {
    Router::new()
        .route(
            "/api/vehicles",
            get(handlers::list_bookings).post(handlers::create_booking),
        )
        .route(
            "/api/vehicles/{id}",
            get(handlers::get_booking)
                .put(handlers::update_booking)
                .delete(handlers::delete_booking),
        )
        .route(
            "/api/vehicles/{id}/status",
            patch(handlers::update_booking_status),
        )
        .route("/api/vehicles/user/{user_id}", get(handlers::list_user_bookings))
        .route(
            "/api/vehicles/status/{status}",
            get(handlers::list_bookings_by_status),
        )
        .with_state(service)
}
