use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::hotels::models::HotelBooking;
use crate::shared::constants::{
    DEFAULT_BOOKING_GUESTS, DEFAULT_ROOM_TYPE, DEFAULT_SEARCH_GUESTS,
};
use crate::shared::money::validate_price;
use crate::shared::status::BookingStatus;

/// Response DTO for hotel booking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelBookingResponseDto {
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
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl From<HotelBooking> for HotelBookingResponseDto {
    fn from(h: HotelBooking) -> Self {
        Self {
            id: h.id,
            user_id: h.user_id,
            hotel_name: h.hotel_name,
            location: h.location,
            check_in_date: h.check_in_date,
            check_out_date: h.check_out_date,
            number_of_guests: h.number_of_guests,
            guest_name: h.guest_name,
            guest_email: h.guest_email,
            guest_phone: h.guest_phone,
            room_type: h.room_type,
            special_requests: h.special_requests,
            status: h.status,
            total_price: h.total_price,
            notes: h.notes,
            created_date: h.created_at,
            modified_date: h.modified_at,
            completed_date: h.completed_at,
        }
    }
}

/// Request DTO for creating or updating a hotel booking
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveHotelBookingDto {
    #[validate(length(max = 200))]
    pub hotel_name: String,

    #[validate(length(max = 200))]
    pub location: String,

    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,

    #[serde(default = "default_guests")]
    #[validate(range(min = 1, message = "Number of guests must be at least 1"))]
    pub number_of_guests: i32,

    #[validate(length(max = 100))]
    pub guest_name: Option<String>,

    #[validate(email(message = "Invalid guest email"))]
    pub guest_email: Option<String>,

    #[validate(regex(
        path = *crate::shared::validation::PHONE_REGEX,
        message = "Invalid guest phone number"
    ))]
    pub guest_phone: Option<String>,

    /// Defaults to "Standard"
    #[validate(length(max = 50))]
    pub room_type: Option<String>,

    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
}

fn default_guests() -> i32 {
    DEFAULT_BOOKING_GUESTS
}

impl SaveHotelBookingDto {
    /// Checks that must pass before anything is written
    pub fn validate_stay(&self) -> Result<()> {
        if self.hotel_name.trim().is_empty() {
            return Err(AppError::Validation("Hotel name is required".to_string()));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::Validation("Location is required".to_string()));
        }
        if self.check_in_date >= self.check_out_date {
            return Err(AppError::Validation(
                "Check-in date must be before check-out date".to_string(),
            ));
        }
        Ok(())
    }

    pub fn room_type_or_default(&self) -> &str {
        self.room_type
            .as_deref()
            .map(str::trim)
            .filter(|room| !room.is_empty())
            .unwrap_or(DEFAULT_ROOM_TYPE)
    }
}

/// Request DTO for the admin status update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHotelStatusDto {
    /// Name (e.g. "Confirmed") or numeric code (0-4)
    pub status: BookingStatus,

    #[validate(custom(function = "validate_price"))]
    pub total_price: Option<Decimal>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Hotel search filters
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct HotelSearchQuery {
    /// Case-insensitive substring of the location
    pub location: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    /// Minimum number of guests; defaults to 1
    #[serde(default = "default_search_guests")]
    pub guests: i32,
}

fn default_search_guests() -> i32 {
    DEFAULT_SEARCH_GUESTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking(check_in: &str, check_out: &str) -> SaveHotelBookingDto {
        serde_json::from_value(json!({
            "hotelName": "Hotel Yak & Yeti",
            "location": "Kathmandu",
            "checkInDate": check_in,
            "checkOutDate": check_out
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_stay() {
        let dto = booking("2026-12-01T14:00:00Z", "2026-12-04T11:00:00Z");
        assert!(dto.validate().is_ok());
        assert!(dto.validate_stay().is_ok());
        assert_eq!(dto.number_of_guests, 1);
        assert_eq!(dto.room_type_or_default(), "Standard");
    }

    #[test]
    fn test_same_day_checkout_is_rejected() {
        let dto = booking("2026-12-01T14:00:00Z", "2026-12-01T14:00:00Z");
        let err = dto.validate_stay().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Check-in date must be before check-out date"
        );
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let mut dto = booking("2026-12-01T14:00:00Z", "2026-12-04T11:00:00Z");
        dto.hotel_name = "   ".to_string();
        assert_eq!(
            dto.validate_stay().unwrap_err().to_string(),
            "Validation error: Hotel name is required"
        );

        dto.hotel_name = "Fish Tail Lodge".to_string();
        dto.location = String::new();
        assert_eq!(
            dto.validate_stay().unwrap_err().to_string(),
            "Validation error: Location is required"
        );
    }

    #[test]
    fn test_explicit_room_type_is_kept() {
        let mut dto = booking("2026-12-01T14:00:00Z", "2026-12-04T11:00:00Z");
        dto.room_type = Some("Deluxe".to_string());
        assert_eq!(dto.room_type_or_default(), "Deluxe");
    }

    #[test]
    fn test_search_query_defaults_guests() {
        let query: HotelSearchQuery = serde_json::from_value(json!({
            "location": "pokhara",
            "checkIn": "2026-12-01T00:00:00Z",
            "checkOut": "2026-12-31T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(query.guests, DEFAULT_SEARCH_GUESTS);
    }

    #[test]
    fn test_booking_defaults_guests() {
        let dto = booking("2026-12-01T14:00:00Z", "2026-12-04T11:00:00Z");
        assert_eq!(dto.number_of_guests, DEFAULT_BOOKING_GUESTS);
    }

    #[test]
    fn test_status_total_price_must_fit_column() {
        let dto: UpdateHotelStatusDto = serde_json::from_value(json!({
            "status": "Confirmed",
            "totalPrice": 100000000
        }))
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: UpdateHotelStatusDto = serde_json::from_value(json!({
            "status": "Confirmed",
            "totalPrice": 12500.75
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
    }
}
