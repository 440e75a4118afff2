use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::shared::status::BookingStatus;

/// Database model for vehicle rental booking
#[derive(Debug, Clone, FromRow)]
pub struct VehicleBooking {
    pub id: i32,
    pub user_id: i32,
    pub vehicle_type: String,
    pub pickup_date: DateTime<Utc>,
    pub drop_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub pickup_location: Option<String>,
    pub drop_location: Option<String>,
    pub number_of_passengers: Option<i32>,
    pub total_cost: Option<Decimal>,
    pub driver_name: Option<String>,
    pub driver_contact_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
