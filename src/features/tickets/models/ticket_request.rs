use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::shared::status::{wire_enum, BookingStatus};

/// Mode of travel for a ticket request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_type", rename_all = "snake_case")]
pub enum TicketType {
    Flight,
    Bus,
    Train,
}

wire_enum!(TicketType, "ticket type" {
    Flight = 0,
    Bus = 1,
    Train = 2,
});

/// Database model for ticket request
#[derive(Debug, Clone, FromRow)]
pub struct TicketRequest {
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
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_type_wire_format() {
        assert_eq!(serde_json::to_value(TicketType::Train).unwrap(), "Train");
        assert_eq!("bus".parse::<TicketType>(), Ok(TicketType::Bus));
        assert_eq!(TicketType::try_from(0), Ok(TicketType::Flight));
        assert_eq!(
            "Boat".parse::<TicketType>(),
            Err("Invalid ticket type: Boat".to_string())
        );
    }
}
