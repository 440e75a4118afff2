use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::immigration::handlers;
use crate::features::immigration::services::ImmigrationService;

/// Create routes for the immigration feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<ImmigrationService>) -> Router {
    Router::new()
        .route(
            "/api/immigration",
            get(handlers::list_applications).post(handlers::create_application),
        )
        .route(
            "/api/immigration/{id}",
            get(handlers::get_application)
                .put(handlers::update_application)
                .delete(handlers::delete_application),
        )
        .route(
            "/api/immigration/{id}/status",
            patch(handlers::update_application_status),
        )
        .route(
            "/api/immigration/user/{user_id}",
            get(handlers::list_user_applications),
        )
        .route(
            "/api/immigration/status/{status}",
            get(handlers::list_applications_by_status),
        )
        .route(
            "/api/immigration/country/{country}",
            get(handlers::list_applications_by_country),
        )
        .with_state(service)
}
