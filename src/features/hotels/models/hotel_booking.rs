use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::shared::status::BookingStatus;

/// Database model for hotel reservation
#[derive(Debug, Clone, FromRow)]
pub struct HotelBooking {
    pub id: i32,
    pub user_id: i32,
    pub hotel_name: String,
    pub location: String,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub number_of_guests: i32,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub room_type: Option<String>,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub total_price: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
