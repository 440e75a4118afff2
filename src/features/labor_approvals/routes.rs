use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::labor_approvals::handlers;
use crate::features::labor_approvals::services::LaborApprovalService;

/// Create routes for the labor approvals feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<LaborApprovalService>) -> Router {
    Router::new()
        .route(
            "/api/laborapprovals",
            get(handlers::list_applications).post(handlers::create_application),
        )
        .route(
            "/api/laborapprovals/my-applications",
            get(handlers::my_applications),
        )
        .route(
            "/api/laborapprovals/calculate-fee",
            get(handlers::calculate_fee),
        )
        .route(
            "/api/laborapprovals/{id}",
            get(handlers::get_application).delete(handlers::delete_application),
        )
        .route(
            "/api/laborapprovals/{id}/status",
            put(handlers::update_status),
        )
        .route(
            "/api/laborapprovals/{id}/payment",
            post(handlers::process_payment),
        )
        .with_state(service)
}
