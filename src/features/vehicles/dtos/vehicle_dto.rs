use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::vehicles::models::VehicleBooking;
use crate::shared::money::validate_price;
use crate::shared::status::BookingStatus;

/// Response DTO for vehicle booking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleBookingResponseDto {
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
    pub created_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl From<VehicleBooking> for VehicleBookingResponseDto {
    fn from(v: VehicleBooking) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            vehicle_type: v.vehicle_type,
            pickup_date: v.pickup_date,
            drop_date: v.drop_date,
            status: v.status,
            pickup_location: v.pickup_location,
            drop_location: v.drop_location,
            number_of_passengers: v.number_of_passengers,
            total_cost: v.total_cost,
            driver_name: v.driver_name,
            driver_contact_number: v.driver_contact_number,
            notes: v.notes,
            created_date: v.created_at,
            completed_date: v.completed_at,
        }
    }
}

/// Public view of a booked vehicle. Customer and driver details stay private.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableVehicleDto {
    pub id: i32,
    pub vehicle_type: String,
    pub pickup_date: DateTime<Utc>,
    pub drop_date: DateTime<Utc>,
    pub pickup_location: Option<String>,
    pub drop_location: Option<String>,
    pub number_of_passengers: Option<i32>,
}

impl From<VehicleBooking> for AvailableVehicleDto {
    fn from(v: VehicleBooking) -> Self {
        Self {
            id: v.id,
            vehicle_type: v.vehicle_type,
            pickup_date: v.pickup_date,
            drop_date: v.drop_date,
            pickup_location: v.pickup_location,
            drop_location: v.drop_location,
            number_of_passengers: v.number_of_passengers,
        }
    }
}

/// A pickup may not come after the drop-off
pub fn ensure_rental_window(pickup: DateTime<Utc>, drop: DateTime<Utc>) -> Result<()> {
    if pickup > drop {
        return Err(AppError::Validation(
            "Pickup date must be on or before drop date".to_string(),
        ));
    }
    Ok(())
}

/// Request DTO for creating a vehicle booking
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleBookingDto {
    #[validate(length(min = 1, max = 50, message = "Vehicle type must be 1-50 characters"))]
    pub vehicle_type: String,

    pub pickup_date: DateTime<Utc>,
    pub drop_date: DateTime<Utc>,

    #[validate(length(max = 200))]
    pub pickup_location: Option<String>,

    #[validate(length(max = 200))]
    pub drop_location: Option<String>,

    #[validate(range(min = 1, message = "Number of passengers must be at least 1"))]
    pub number_of_passengers: Option<i32>,

    pub notes: Option<String>,
}

/// Request DTO for updating a vehicle booking. The vehicle type is fixed at creation.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleBookingDto {
    pub pickup_date: DateTime<Utc>,
    pub drop_date: DateTime<Utc>,

    #[validate(length(max = 200))]
    pub pickup_location: Option<String>,

    #[validate(length(max = 200))]
    pub drop_location: Option<String>,

    #[validate(range(min = 1, message = "Number of passengers must be at least 1"))]
    pub number_of_passengers: Option<i32>,

    pub notes: Option<String>,
}

/// Request DTO for the admin status update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleStatusDto {
    /// Name (e.g. "Confirmed") or numeric code (0-4)
    pub status: BookingStatus,

    #[validate(length(max = 100))]
    pub driver_name: Option<String>,

    #[validate(regex(
        path = *crate::shared::validation::PHONE_REGEX,
        message = "Invalid driver contact number"
    ))]
    pub driver_contact_number: Option<String>,

    /// Left unchanged when omitted
    #[validate(custom(function = "validate_price"))]
    pub total_cost: Option<Decimal>,
}

/// Query for vehicles free over a rental window
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct VehicleAvailabilityQuery {
    pub pickup_date: DateTime<Utc>,
    pub drop_date: DateTime<Utc>,
}
