use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::hotels::handlers;
use crate::features::hotels::services::HotelService;

/// Create routes for the hotels feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<HotelService>) -> Router {
    Router::new()
        .route(
            "/api/hotels",
            get(handlers::list_bookings).post(handlers::create_booking),
        )
        .route("/api/hotels/search", get(handlers::search_hotels))
        .route(
            "/api/hotels/{id}",
            get(handlers::get_booking)
                .put(handlers::update_booking)
                .delete(handlers::delete_booking),
        )
        .route("/api/hotels/{id}/status", put(handlers::update_booking_status))
        .route("/api/hotels/user/{user_id}", get(handlers::list_user_bookings))
        .with_state(service)
}
