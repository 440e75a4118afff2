use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::hotels::dtos::{
    HotelBookingResponseDto, HotelSearchQuery, SaveHotelBookingDto, UpdateHotelStatusDto,
};
use crate::features::hotels::models::HotelBooking;
use crate::shared::search::like_pattern;
use crate::shared::status::BookingStatus;

const NOT_FOUND: &str = "Booking not found";

/// Service for hotel reservations
pub struct HotelService {
    pool: PgPool,
}

impl HotelService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<HotelBookingResponseDto>> {
        let bookings = sqlx::query_as::<_, HotelBooking>(
            "SELECT * FROM hotel_bookings ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list hotel bookings: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(bookings.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<HotelBookingResponseDto>> {
        let bookings = sqlx::query_as::<_, HotelBooking>(
            "SELECT * FROM hotel_bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list hotel bookings by user: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(bookings.into_iter().map(Into::into).collect())
    }

    /// Bookings at a matching location whose stay falls inside the requested window
    pub async fn search(&self, query: &HotelSearchQuery) -> Result<Vec<HotelBookingResponseDto>> {
        let bookings = sqlx::query_as::<_, HotelBooking>(
            r#"
            SELECT * FROM hotel_bookings
            WHERE location ILIKE $1 ESCAPE '\'
              AND check_in_date >= $2
              AND check_out_date <= $3
              AND number_of_guests >= $4
            ORDER BY created_at DESC
            "#,
        )
        .bind(like_pattern(&query.location))
        .bind(query.check_in)
        .bind(query.check_out)
        .bind(query.guests)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search hotel bookings: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(bookings.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<HotelBookingResponseDto> {
        sqlx::query_as::<_, HotelBooking>("SELECT * FROM hotel_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get hotel booking by ID: {:?}", e);
                AppError::Database(e)
            })?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn owner_of(&self, id: i32) -> Result<i32> {
        sqlx::query_scalar::<_, i32>("SELECT user_id FROM hotel_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get hotel booking owner: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// The stay is validated before the insert so a bad request never writes a row.
    pub async fn create(
        &self,
        user_id: i32,
        dto: SaveHotelBookingDto,
    ) -> Result<HotelBookingResponseDto> {
        dto.validate_stay()?;

        let booking = sqlx::query_as::<_, HotelBooking>(
            r#"
            INSERT INTO hotel_bookings (
                user_id, hotel_name, location, check_in_date, check_out_date,
                number_of_guests, guest_name, guest_email, guest_phone, room_type,
                special_requests, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(dto.hotel_name.trim())
        .bind(dto.location.trim())
        .bind(dto.check_in_date)
        .bind(dto.check_out_date)
        .bind(dto.number_of_guests)
        .bind(&dto.guest_name)
        .bind(&dto.guest_email)
        .bind(&dto.guest_phone)
        .bind(dto.room_type_or_default())
        .bind(&dto.special_requests)
        .bind(BookingStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create hotel booking: {:?}", e);
            AppError::from_write(
                e,
                "Hotel booking already exists",
                &format!("User with ID {} not found", user_id),
            )
        })?;

        tracing::info!(
            "Hotel booking created: id={}, user={}, hotel={}",
            booking.id,
            user_id,
            booking.hotel_name
        );

        Ok(booking.into())
    }

    pub async fn update(
        &self,
        id: i32,
        dto: SaveHotelBookingDto,
    ) -> Result<HotelBookingResponseDto> {
        dto.validate_stay()?;

        let booking = sqlx::query_as::<_, HotelBooking>(
            r#"
            UPDATE hotel_bookings
            SET hotel_name = $2, location = $3, check_in_date = $4, check_out_date = $5,
                number_of_guests = $6, guest_name = $7, guest_email = $8, guest_phone = $9,
                room_type = $10, special_requests = $11, modified_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.hotel_name.trim())
        .bind(dto.location.trim())
        .bind(dto.check_in_date)
        .bind(dto.check_out_date)
        .bind(dto.number_of_guests)
        .bind(&dto.guest_name)
        .bind(&dto.guest_email)
        .bind(&dto.guest_phone)
        .bind(dto.room_type_or_default())
        .bind(&dto.special_requests)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update hotel booking: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

        tracing::info!("Hotel booking updated: id={}", booking.id);

        Ok(booking.into())
    }

    /// Price and notes are replaced as given. Every status write stamps the
    /// modification time; Completed also stamps completion.
    pub async fn update_status(
        &self,
        id: i32,
        dto: UpdateHotelStatusDto,
    ) -> Result<HotelBookingResponseDto> {
        let booking = sqlx::query_as::<_, HotelBooking>(
            r#"
            UPDATE hotel_bookings
            SET status = $2,
                total_price = $3,
                notes = $4,
                modified_at = NOW(),
                completed_at = CASE WHEN $5 THEN NOW() ELSE completed_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(dto.total_price)
        .bind(&dto.notes)
        .bind(dto.status.stamps_completion())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update hotel booking status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

        tracing::info!(
            "Hotel booking status updated: id={}, status={}",
            booking.id,
            booking.status
        );

        Ok(booking.into())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM hotel_bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete hotel booking: {:?}", e);
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Hotel booking deleted: id={}", id);
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::insert_user;
    use serde_json::json;

    fn booking(check_in: &str, check_out: &str) -> SaveHotelBookingDto {
        serde_json::from_value(json!({
            "hotelName": "Temple Tree Resort",
            "location": "Lakeside, Pokhara",
            "checkInDate": check_in,
            "checkOutDate": check_out,
            "numberOfGuests": 2
        }))
        .unwrap()
    }

    async fn booking_count(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM hotel_bookings")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_inverted_stay_writes_nothing(pool: PgPool) {
        let user_id = insert_user(&pool, "guest@example.com", UserRole::Customer).await;
        let service = HotelService::new(pool.clone());

        let err = service
            .create(user_id, booking("2026-12-04T11:00:00Z", "2026-12-01T14:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(booking_count(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_defaults_and_search(pool: PgPool) {
        let user_id = insert_user(&pool, "search@example.com", UserRole::Customer).await;
        let service = HotelService::new(pool);

        let created = service
            .create(user_id, booking("2026-12-01T14:00:00Z", "2026-12-04T11:00:00Z"))
            .await
            .unwrap();
        assert_eq!(created.status, BookingStatus::Pending);
        assert_eq!(created.room_type.as_deref(), Some("Standard"));

        let query: HotelSearchQuery = serde_json::from_value(json!({
            "location": "POKHARA",
            "checkIn": "2026-11-30T00:00:00Z",
            "checkOut": "2026-12-05T00:00:00Z",
            "guests": 2
        }))
        .unwrap();
        let found = service.search(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);

        let query = HotelSearchQuery { guests: 3, ..query };
        assert!(service.search(&query).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_status_change_stamps_modification_and_completion(pool: PgPool) {
        let user_id = insert_user(&pool, "stay@example.com", UserRole::Customer).await;
        let service = HotelService::new(pool);
        let created = service
            .create(user_id, booking("2026-12-01T14:00:00Z", "2026-12-04T11:00:00Z"))
            .await
            .unwrap();

        let confirmed = service
            .update_status(
                created.id,
                UpdateHotelStatusDto {
                    status: BookingStatus::Confirmed,
                    total_price: Some(rust_decimal::Decimal::new(2450050, 2)),
                    notes: Some("Lake view".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(confirmed.modified_date.is_some());
        assert!(confirmed.completed_date.is_none());

        let completed = service
            .update_status(
                created.id,
                UpdateHotelStatusDto {
                    status: BookingStatus::Completed,
                    total_price: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert!(completed.completed_date.unwrap() >= completed.created_date);
        assert!(completed.total_price.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_missing_booking(pool: PgPool) {
        let service = HotelService::new(pool);

        assert!(!service.delete(404).await.unwrap());
        assert!(matches!(
            service.get_by_id(404).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
