use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::vehicles::dtos::{
    AvailableVehicleDto, CreateVehicleBookingDto, UpdateVehicleBookingDto, UpdateVehicleStatusDto,
    VehicleBookingResponseDto,
};
use crate::features::vehicles::models::VehicleBooking;
use crate::shared::status::BookingStatus;

/// Service for vehicle rental bookings
pub struct VehicleService {
    pool: PgPool,
}

impl VehicleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: i32) -> AppError {
        AppError::NotFound(format!("Booking with ID {} not found", id))
    }

    pub async fn list_all(&self) -> Result<Vec<VehicleBookingResponseDto>> {
        let bookings = sqlx::query_as::<_, VehicleBooking>(
            "SELECT * FROM vehicle_bookings ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list vehicle bookings: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(bookings.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<VehicleBookingResponseDto>> {
        let bookings = sqlx::query_as::<_, VehicleBooking>(
            "SELECT * FROM vehicle_bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list vehicle bookings by user: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(bookings.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_status(
        &self,
        status: BookingStatus,
    ) -> Result<Vec<VehicleBookingResponseDto>> {
        let bookings = sqlx::query_as::<_, VehicleBooking>(
            "SELECT * FROM vehicle_bookings WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list vehicle bookings by status: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(bookings.into_iter().map(Into::into).collect())
    }

    /// Confirmed bookings whose rental window does not overlap the requested one,
    /// ordered by pickup date
    pub async fn list_available(
        &self,
        pickup_date: DateTime<Utc>,
        drop_date: DateTime<Utc>,
    ) -> Result<Vec<AvailableVehicleDto>> {
        let bookings = sqlx::query_as::<_, VehicleBooking>(
            r#"
            SELECT * FROM vehicle_bookings
            WHERE status = $1
              AND (drop_date < $2 OR pickup_date > $3)
            ORDER BY pickup_date
            "#,
        )
        .bind(BookingStatus::Confirmed)
        .bind(pickup_date)
        .bind(drop_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list available vehicles: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(bookings.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<VehicleBookingResponseDto> {
        sqlx::query_as::<_, VehicleBooking>("SELECT * FROM vehicle_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get vehicle booking by ID: {:?}", e);
                AppError::Database(e)
            })?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    pub async fn owner_of(&self, id: i32) -> Result<i32> {
        sqlx::query_scalar::<_, i32>("SELECT user_id FROM vehicle_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get vehicle booking owner: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn create(
        &self,
        user_id: i32,
        dto: CreateVehicleBookingDto,
    ) -> Result<VehicleBookingResponseDto> {
        let booking = sqlx::query_as::<_, VehicleBooking>(
            r#"
            INSERT INTO vehicle_bookings (
                user_id, vehicle_type, pickup_date, drop_date, pickup_location,
                drop_location, number_of_passengers, notes, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&dto.vehicle_type)
        .bind(dto.pickup_date)
        .bind(dto.drop_date)
        .bind(&dto.pickup_location)
        .bind(&dto.drop_location)
        .bind(dto.number_of_passengers)
        .bind(&dto.notes)
        .bind(BookingStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create vehicle booking: {:?}", e);
            AppError::from_write(
                e,
                "Booking already exists",
                &format!("User with ID {} not found", user_id),
            )
        })?;

        tracing::info!(
            "Vehicle booking created: id={}, user={}, vehicle={}",
            booking.id,
            user_id,
            booking.vehicle_type
        );

        Ok(booking.into())
    }

    pub async fn update(
        &self,
        id: i32,
        dto: UpdateVehicleBookingDto,
    ) -> Result<VehicleBookingResponseDto> {
        let booking = sqlx::query_as::<_, VehicleBooking>(
            r#"
            UPDATE vehicle_bookings
            SET pickup_date = $2, drop_date = $3, pickup_location = $4, drop_location = $5,
                number_of_passengers = $6, notes = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.pickup_date)
        .bind(dto.drop_date)
        .bind(&dto.pickup_location)
        .bind(&dto.drop_location)
        .bind(dto.number_of_passengers)
        .bind(&dto.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update vehicle booking: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| Self::not_found(id))?;

        tracing::info!("Vehicle booking updated: id={}", booking.id);

        Ok(booking.into())
    }

    /// Driver details are replaced as given; the total cost only when provided.
    pub async fn update_status(
        &self,
        id: i32,
        dto: UpdateVehicleStatusDto,
    ) -> Result<VehicleBookingResponseDto> {
        let booking = sqlx::query_as::<_, VehicleBooking>(
            r#"
            UPDATE vehicle_bookings
            SET status = $2,
                driver_name = $3,
                driver_contact_number = $4,
                total_cost = COALESCE($5, total_cost),
                completed_at = CASE WHEN $6 THEN NOW() ELSE completed_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(&dto.driver_name)
        .bind(&dto.driver_contact_number)
        .bind(dto.total_cost)
        .bind(dto.status.stamps_completion())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update vehicle booking status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| Self::not_found(id))?;

        tracing::info!(
            "Vehicle booking status updated: id={}, status={}",
            booking.id,
            booking.status
        );

        Ok(booking.into())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vehicle_bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete vehicle booking: {:?}", e);
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Vehicle booking deleted: id={}", id);
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::insert_user;
    use chrono::TimeZone;
    use serde_json::json;

    fn rental(pickup: &str, drop: &str) -> CreateVehicleBookingDto {
        serde_json::from_value(json!({
            "vehicleType": "Scorpio",
            "pickupDate": pickup,
            "dropDate": drop,
            "pickupLocation": "Tribhuvan Airport",
            "numberOfPassengers": 4
        }))
        .unwrap()
    }

    fn status(status: BookingStatus) -> UpdateVehicleStatusDto {
        UpdateVehicleStatusDto {
            status,
            driver_name: Some("Hari".to_string()),
            driver_contact_number: Some("+977 9841000000".to_string()),
            total_cost: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_only_confirmed_outside_window_are_available(pool: PgPool) {
        let user_id = insert_user(&pool, "driver@example.com", UserRole::Customer).await;
        let service = VehicleService::new(pool);

        let early = service
            .create(user_id, rental("2026-11-01T09:00:00Z", "2026-11-03T18:00:00Z"))
            .await
            .unwrap();
        let overlapping = service
            .create(user_id, rental("2026-11-09T09:00:00Z", "2026-11-12T18:00:00Z"))
            .await
            .unwrap();
        let pending = service
            .create(user_id, rental("2026-11-20T09:00:00Z", "2026-11-21T18:00:00Z"))
            .await
            .unwrap();

        for id in [early.id, overlapping.id] {
            service
                .update_status(id, status(BookingStatus::Confirmed))
                .await
                .unwrap();
        }

        let available = service
            .list_available(
                Utc.with_ymd_and_hms(2026, 11, 10, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 11, 15, 0, 0, 0).unwrap(),
            )
            .await
            .unwrap();
        let ids: Vec<i32> = available.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![early.id]);
        assert!(!ids.contains(&pending.id));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_completion_keeps_cost_and_stamps_time(pool: PgPool) {
        let user_id = insert_user(&pool, "cost@example.com", UserRole::Customer).await;
        let service = VehicleService::new(pool);
        let created = service
            .create(user_id, rental("2026-11-01T09:00:00Z", "2026-11-03T18:00:00Z"))
            .await
            .unwrap();

        let priced = service
            .update_status(
                created.id,
                UpdateVehicleStatusDto {
                    total_cost: Some(rust_decimal::Decimal::from(12000)),
                    ..status(BookingStatus::Confirmed)
                },
            )
            .await
            .unwrap();
        assert_eq!(priced.driver_name.as_deref(), Some("Hari"));

        let completed = service
            .update_status(created.id, status(BookingStatus::Completed))
            .await
            .unwrap();
        assert_eq!(completed.total_cost, Some(rust_decimal::Decimal::from(12000)));
        assert!(completed.completed_date.unwrap() >= completed.created_date);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_missing_booking(pool: PgPool) {
        let service = VehicleService::new(pool);

        assert!(!service.delete(8).await.unwrap());
        assert!(matches!(
            service.owner_of(8).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
