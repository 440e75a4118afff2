use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::hotels::{dtos as hotels_dtos, handlers as hotels_handlers};
use crate::features::immigration::{
    dtos as immigration_dtos, handlers as immigration_handlers, models as immigration_models,
};
use crate::features::labor_approvals::{
    dtos as labor_dtos, handlers as labor_handlers, models as labor_models,
};
use crate::features::tickets::{
    dtos as tickets_dtos, handlers as tickets_handlers, models as tickets_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::features::vehicles::{dtos as vehicles_dtos, handlers as vehicles_handlers};
use crate::shared::status::BookingStatus;
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::change_password,
        // Users
        users_handlers::list_users,
        users_handlers::get_user,
        users_handlers::get_user_by_email,
        users_handlers::update_user,
        users_handlers::delete_user,
        users_handlers::check_email,
        // Tickets
        tickets_handlers::list_tickets,
        tickets_handlers::get_ticket,
        tickets_handlers::list_user_tickets,
        tickets_handlers::create_ticket,
        tickets_handlers::update_ticket,
        tickets_handlers::update_ticket_status,
        tickets_handlers::delete_ticket,
        tickets_handlers::list_tickets_by_status,
        // Vehicles
        vehicles_handlers::list_bookings,
        vehicles_handlers::get_booking,
        vehicles_handlers::list_user_bookings,
        vehicles_handlers::create_booking,
        vehicles_handlers::update_booking,
        vehicles_handlers::update_booking_status,
        vehicles_handlers::delete_booking,
        vehicles_handlers::list_available_vehicles,
        vehicles_handlers::list_bookings_by_status,
        // Hotels
        hotels_handlers::list_bookings,
        hotels_handlers::get_booking,
        hotels_handlers::list_user_bookings,
        hotels_handlers::search_hotels,
        hotels_handlers::create_booking,
        hotels_handlers::update_booking,
        hotels_handlers::update_booking_status,
        hotels_handlers::delete_booking,
        // Immigration
        immigration_handlers::list_applications,
        immigration_handlers::get_application,
        immigration_handlers::list_user_applications,
        immigration_handlers::create_application,
        immigration_handlers::update_application,
        immigration_handlers::update_application_status,
        immigration_handlers::delete_application,
        immigration_handlers::list_applications_by_status,
        immigration_handlers::list_applications_by_country,
        // Labor approvals
        labor_handlers::list_applications,
        labor_handlers::my_applications,
        labor_handlers::get_application,
        labor_handlers::create_application,
        labor_handlers::update_status,
        labor_handlers::process_payment,
        labor_handlers::calculate_fee,
        labor_handlers::delete_application,
    ),
    components(
        schemas(
            BookingStatus,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::ChangePasswordRequestDto,
            ApiResponse<auth_dtos::LoginResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::UserResponseDto,
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<bool>,
            // Tickets
            tickets_models::TicketType,
            tickets_dtos::TicketResponseDto,
            tickets_dtos::SaveTicketDto,
            tickets_dtos::UpdateTicketStatusDto,
            ApiResponse<tickets_dtos::TicketResponseDto>,
            ApiResponse<Vec<tickets_dtos::TicketResponseDto>>,
            // Vehicles
            vehicles_dtos::VehicleBookingResponseDto,
            vehicles_dtos::CreateVehicleBookingDto,
            vehicles_dtos::UpdateVehicleBookingDto,
            vehicles_dtos::UpdateVehicleStatusDto,
            vehicles_dtos::AvailableVehicleDto,
            ApiResponse<Vec<vehicles_dtos::AvailableVehicleDto>>,
            ApiResponse<vehicles_dtos::VehicleBookingResponseDto>,
            ApiResponse<Vec<vehicles_dtos::VehicleBookingResponseDto>>,
            // Hotels
            hotels_dtos::HotelBookingResponseDto,
            hotels_dtos::SaveHotelBookingDto,
            hotels_dtos::UpdateHotelStatusDto,
            ApiResponse<hotels_dtos::HotelBookingResponseDto>,
            ApiResponse<Vec<hotels_dtos::HotelBookingResponseDto>>,
            // Immigration
            immigration_models::ApplicationStatus,
            immigration_dtos::ImmigrationApplicationResponseDto,
            immigration_dtos::SaveImmigrationApplicationDto,
            immigration_dtos::UpdateApplicationStatusDto,
            ApiResponse<immigration_dtos::ImmigrationApplicationResponseDto>,
            ApiResponse<Vec<immigration_dtos::ImmigrationApplicationResponseDto>>,
            // Labor approvals
            labor_models::LaborApprovalStatus,
            labor_dtos::LaborApprovalResponseDto,
            labor_dtos::CreateLaborApprovalDto,
            labor_dtos::UpdateLaborApprovalStatusDto,
            labor_dtos::LaborApprovalPaymentDto,
            labor_dtos::FeeBreakdownDto,
            ApiResponse<labor_dtos::LaborApprovalResponseDto>,
            ApiResponse<Vec<labor_dtos::LaborApprovalResponseDto>>,
            ApiResponse<labor_dtos::FeeBreakdownDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and password changes"),
        (name = "users", description = "User accounts"),
        (name = "tickets", description = "Flight, bus and train ticket requests"),
        (name = "vehicles", description = "Vehicle rental bookings"),
        (name = "hotels", description = "Hotel reservations"),
        (name = "immigration", description = "Visa applications"),
        (name = "labor-approvals", description = "Foreign labor approval (Shram Swikriti) applications and fees"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Alfa Travels & Tours API",
        version = "0.1.0",
        description = "Back office API for Alfa Travels & Tours",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_vertical_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/users/check-email/{email}",
            "/api/tickets/{id}/status",
            "/api/vehicles/available",
            "/api/hotels/search",
            "/api/immigration/country/{country}",
            "/api/laborapprovals/{id}/payment",
            "/api/laborapprovals/calculate-fee",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
