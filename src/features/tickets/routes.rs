use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::tickets::handlers;
use crate::features::tickets::services::TicketService;

/// Create routes for the tickets feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<TicketService>) -> Router {
    Router::new()
        .route(
            "/api/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route(
            "/api/tickets/{id}",
            get(handlers::get_ticket)
                .put(handlers::update_ticket)
                .delete(handlers::delete_ticket),
        )
        .route("/api/tickets/{id}/status", patch(handlers::update_ticket_status))
        .route("/api/tickets/user/{user_id}", get(handlers::list_user_tickets))
        .route("/api/tickets/status/{status}", get(handlers::list_tickets_by_status))
        .with_state(service)
}
