use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::tickets::dtos::{SaveTicketDto, TicketResponseDto, UpdateTicketStatusDto};
use crate::features::tickets::models::TicketRequest;
use crate::shared::status::BookingStatus;

/// Service for ticket request operations
pub struct TicketService {
    pool: PgPool,
}

impl TicketService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: i32) -> AppError {
        AppError::NotFound(format!("Ticket with ID {} not found", id))
    }

    /// List all ticket requests, newest first
    pub async fn list_all(&self) -> Result<Vec<TicketResponseDto>> {
        let tickets = sqlx::query_as::<_, TicketRequest>(
            "SELECT * FROM ticket_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tickets: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(tickets.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<TicketResponseDto>> {
        let tickets = sqlx::query_as::<_, TicketRequest>(
            "SELECT * FROM ticket_requests WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tickets by user: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(tickets.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_status(&self, status: BookingStatus) -> Result<Vec<TicketResponseDto>> {
        let tickets = sqlx::query_as::<_, TicketRequest>(
            "SELECT * FROM ticket_requests WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tickets by status: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(tickets.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<TicketResponseDto> {
        let ticket = sqlx::query_as::<_, TicketRequest>(
            "SELECT * FROM ticket_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get ticket by ID: {:?}", e);
            AppError::Database(e)
        })?;

        ticket
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))
    }

    /// Owner of a ticket, for access checks ahead of a write
    pub async fn owner_of(&self, id: i32) -> Result<i32> {
        sqlx::query_scalar::<_, i32>("SELECT user_id FROM ticket_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get ticket owner: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Create a ticket request in Pending state. A missing user surfaces through the
    /// foreign key as a not-found error.
    pub async fn create(&self, user_id: i32, dto: SaveTicketDto) -> Result<TicketResponseDto> {
        let ticket = sqlx::query_as::<_, TicketRequest>(
            r#"
            INSERT INTO ticket_requests (
                user_id, from_location, to_location, travel_date, ticket_type,
                number_of_passengers, notes, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&dto.from_location)
        .bind(&dto.to_location)
        .bind(dto.travel_date)
        .bind(dto.ticket_type)
        .bind(dto.number_of_passengers)
        .bind(&dto.notes)
        .bind(BookingStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create ticket: {:?}", e);
            AppError::from_write(
                e,
                "Ticket already exists",
                &format!("User with ID {} not found", user_id),
            )
        })?;

        tracing::info!(
            "Ticket created: id={}, user={}, type={}",
            ticket.id,
            user_id,
            ticket.ticket_type
        );

        Ok(ticket.into())
    }

    pub async fn update(&self, id: i32, dto: SaveTicketDto) -> Result<TicketResponseDto> {
        let ticket = sqlx::query_as::<_, TicketRequest>(
            r#"
            UPDATE ticket_requests
            SET from_location = $2, to_location = $3, travel_date = $4, ticket_type = $5,
                number_of_passengers = $6, notes = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.from_location)
        .bind(&dto.to_location)
        .bind(dto.travel_date)
        .bind(dto.ticket_type)
        .bind(dto.number_of_passengers)
        .bind(&dto.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update ticket: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| Self::not_found(id))?;

        tracing::info!("Ticket updated: id={}", ticket.id);

        Ok(ticket.into())
    }

    /// Set the status; a quoted price replaces the estimate and Completed stamps
    /// the completion time.
    pub async fn update_status(
        &self,
        id: i32,
        dto: UpdateTicketStatusDto,
    ) -> Result<TicketResponseDto> {
        let ticket = sqlx::query_as::<_, TicketRequest>(
            r#"
            UPDATE ticket_requests
            SET status = $2,
                estimated_price = COALESCE($3, estimated_price),
                completed_at = CASE WHEN $4 THEN NOW() ELSE completed_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(dto.price)
        .bind(dto.status.stamps_completion())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update ticket status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| Self::not_found(id))?;

        tracing::info!(
            "Ticket status updated: id={}, status={}",
            ticket.id,
            ticket.status
        );

        Ok(ticket.into())
    }

    /// Returns false when no such ticket exists
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ticket_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete ticket: {:?}", e);
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Ticket deleted: id={}", id);
        }

        Ok(deleted)
    }
}
