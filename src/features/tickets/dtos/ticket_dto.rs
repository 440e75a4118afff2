use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::tickets::models::{TicketRequest, TicketType};
use crate::shared::money::validate_price;
use crate::shared::status::BookingStatus;

/// Response DTO for ticket request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponseDto {
    pub id: i32,
    pub user_id: i32,
    pub from_location: String,
    pub to_location: String,
    pub travel_date: DateTime<Utc>,
    pub ticket_type: TicketType,
    pub status: BookingStatus,
    pub number_of_passengers: Option<i32>,
    pub estimated_price: Option<Decimal>,
    pub notes: Option<String>,
    pub created_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl From<TicketRequest> for TicketResponseDto {
    fn from(t: TicketRequest) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            from_location: t.from_location,
            to_location: t.to_location,
            travel_date: t.travel_date,
            ticket_type: t.ticket_type,
            status: t.status,
            number_of_passengers: t.number_of_passengers,
            estimated_price: t.estimated_price,
            notes: t.notes,
            created_date: t.created_at,
            completed_date: t.completed_at,
        }
    }
}

/// Request DTO for creating or updating a ticket request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTicketDto {
    #[validate(length(min = 1, max = 200, message = "From location must be 1-200 characters"))]
    pub from_location: String,

    #[validate(length(min = 1, max = 200, message = "To location must be 1-200 characters"))]
    pub to_location: String,

    pub travel_date: DateTime<Utc>,

    /// Name (e.g. "Flight") or numeric code (0-2); defaults to Flight
    #[serde(default = "default_ticket_type")]
    pub ticket_type: TicketType,

    #[validate(range(min = 1, message = "Number of passengers must be at least 1"))]
    pub number_of_passengers: Option<i32>,

    pub notes: Option<String>,
}

fn default_ticket_type() -> TicketType {
    TicketType::Flight
}

/// Request DTO for the admin status update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketStatusDto {
    /// Name (e.g. "Confirmed") or numeric code (0-4)
    pub status: BookingStatus,
    /// Quoted price recorded as the estimated price
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_type_defaults_to_flight() {
        let dto: SaveTicketDto = serde_json::from_value(serde_json::json!({
            "fromLocation": "Kathmandu",
            "toLocation": "Dubai",
            "travelDate": "2026-12-01T06:00:00Z"
        }))
        .unwrap();
        assert_eq!(dto.ticket_type, TicketType::Flight);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_zero_passengers_fails_validation() {
        let dto: SaveTicketDto = serde_json::from_value(serde_json::json!({
            "fromLocation": "Kathmandu",
            "toLocation": "Pokhara",
            "travelDate": "2026-12-01T06:00:00Z",
            "ticketType": 1,
            "numberOfPassengers": 0
        }))
        .unwrap();
        assert_eq!(dto.ticket_type, TicketType::Bus);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_status_price_must_fit_column() {
        let dto: UpdateTicketStatusDto = serde_json::from_value(serde_json::json!({
            "status": "Confirmed",
            "price": 99999999.99
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let dto: UpdateTicketStatusDto = serde_json::from_value(serde_json::json!({
            "status": "Confirmed",
            "price": 1000000000
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
