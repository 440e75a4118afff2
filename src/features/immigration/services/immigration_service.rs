use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::immigration::dtos::{
    ImmigrationApplicationResponseDto, SaveImmigrationApplicationDto, UpdateApplicationStatusDto,
};
use crate::features::immigration::models::{ApplicationStatus, ImmigrationApplication};
use crate::shared::search::like_pattern;

/// Service for immigration visa applications
pub struct ImmigrationService {
    pool: PgPool,
}

impl ImmigrationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: i32) -> AppError {
        AppError::NotFound(format!("Application with ID {} not found", id))
    }

    fn duplicate_passport(passport_number: &str) -> String {
        format!(
            "An application for passport {} already exists",
            passport_number
        )
    }

    pub async fn list_all(&self) -> Result<Vec<ImmigrationApplicationResponseDto>> {
        let applications = sqlx::query_as::<_, ImmigrationApplication>(
            "SELECT * FROM immigration_applications ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list immigration applications: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(applications.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<ImmigrationApplicationResponseDto>> {
        let applications = sqlx::query_as::<_, ImmigrationApplication>(
            "SELECT * FROM immigration_applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list immigration applications by user: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(applications.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<ImmigrationApplicationResponseDto>> {
        let applications = sqlx::query_as::<_, ImmigrationApplication>(
            "SELECT * FROM immigration_applications WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list immigration applications by status: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(applications.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive substring match on the target country
    pub async fn list_by_country(
        &self,
        country: &str,
    ) -> Result<Vec<ImmigrationApplicationResponseDto>> {
        let applications = sqlx::query_as::<_, ImmigrationApplication>(
            r#"
            SELECT * FROM immigration_applications
            WHERE target_country ILIKE $1 ESCAPE '\'
            ORDER BY created_at DESC
            "#,
        )
        .bind(like_pattern(country))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list immigration applications by country: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(applications.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<ImmigrationApplicationResponseDto> {
        sqlx::query_as::<_, ImmigrationApplication>(
            "SELECT * FROM immigration_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get immigration application by ID: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    pub async fn owner_of(&self, id: i32) -> Result<i32> {
        sqlx::query_scalar::<_, i32>("SELECT user_id FROM immigration_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get immigration application owner: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Passport numbers are unique across applications; a repeat is a conflict.
    pub async fn create(
        &self,
        user_id: i32,
        dto: SaveImmigrationApplicationDto,
    ) -> Result<ImmigrationApplicationResponseDto> {
        let application = sqlx::query_as::<_, ImmigrationApplication>(
            r#"
            INSERT INTO immigration_applications (
                user_id, full_name, passport_number, target_country,
                passport_expiry_date, visa_type, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&dto.full_name)
        .bind(dto.passport_number.trim())
        .bind(&dto.target_country)
        .bind(dto.passport_expiry_date)
        .bind(&dto.visa_type)
        .bind(ApplicationStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create immigration application: {:?}", e);
            AppError::from_write(
                e,
                &Self::duplicate_passport(dto.passport_number.trim()),
                &format!("User with ID {} not found", user_id),
            )
        })?;

        tracing::info!(
            "Immigration application created: id={}, user={}, country={}",
            application.id,
            user_id,
            application.target_country
        );

        Ok(application.into())
    }

    pub async fn update(
        &self,
        id: i32,
        dto: SaveImmigrationApplicationDto,
    ) -> Result<ImmigrationApplicationResponseDto> {
        let application = sqlx::query_as::<_, ImmigrationApplication>(
            r#"
            UPDATE immigration_applications
            SET full_name = $2, passport_number = $3, target_country = $4,
                passport_expiry_date = $5, visa_type = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.full_name)
        .bind(dto.passport_number.trim())
        .bind(&dto.target_country)
        .bind(dto.passport_expiry_date)
        .bind(&dto.visa_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update immigration application: {:?}", e);
            AppError::from_write(
                e,
                &Self::duplicate_passport(dto.passport_number.trim()),
                &format!("Application with ID {} not found", id),
            )
        })?
        .ok_or_else(|| Self::not_found(id))?;

        tracing::info!("Immigration application updated: id={}", application.id);

        Ok(application.into())
    }

    /// Review fields are replaced as given. Approved and Rejected close the
    /// application.
    pub async fn update_status(
        &self,
        id: i32,
        dto: UpdateApplicationStatusDto,
    ) -> Result<ImmigrationApplicationResponseDto> {
        let application = sqlx::query_as::<_, ImmigrationApplication>(
            r#"
            UPDATE immigration_applications
            SET status = $2,
                rejection_reason = $3,
                admin_notes = $4,
                expected_processing_date = $5,
                updated_at = NOW(),
                completed_at = CASE WHEN $6 THEN NOW() ELSE completed_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(&dto.rejection_reason)
        .bind(&dto.admin_notes)
        .bind(dto.expected_processing_date)
        .bind(dto.status.stamps_completion())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update immigration application status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| Self::not_found(id))?;

        tracing::info!(
            "Immigration application status updated: id={}, status={}",
            application.id,
            application.status
        );

        Ok(application.into())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM immigration_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete immigration application: {:?}", e);
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Immigration application deleted: id={}", id);
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

    fn application(passport: &str) -> SaveImmigrationApplicationDto {
        serde_json::from_value(json!({
            "fullName": "Sita Sharma",
            "passportNumber": passport,
            "targetCountry": "Australia",
            "passportExpiryDate": "2031-06-30T00:00:00Z",
            "visaType": "Student"
        }))
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicate_passport_is_conflict(pool: PgPool) {
        let first = insert_user(&pool, "sita@example.com", UserRole::Customer).await;
        let second = insert_user(&pool, "gita@example.com", UserRole::Customer).await;
        let service = ImmigrationService::new(pool);

        service.create(first, application("PA7654321")).await.unwrap();
        let err = service
            .create(second, application(" PA7654321 "))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conflict: An application for passport PA7654321 already exists"
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_rejection_closes_application(pool: PgPool) {
        let user_id = insert_user(&pool, "visa@example.com", UserRole::Customer).await;
        let service = ImmigrationService::new(pool);
        let created = service.create(user_id, application("PB1111111")).await.unwrap();

        let review = |status| UpdateApplicationStatusDto {
            status,
            rejection_reason: None,
            admin_notes: None,
            expected_processing_date: None,
        };

        let in_review = service
            .update_status(created.id, review(ApplicationStatus::UnderReview))
            .await
            .unwrap();
        assert!(in_review.completed_date.is_none());
        assert!(in_review.updated_date.is_some());

        let rejected = service
            .update_status(
                created.id,
                UpdateApplicationStatusDto {
                    rejection_reason: Some("Incomplete bank statement".to_string()),
                    ..review(ApplicationStatus::Rejected)
                },
            )
            .await
            .unwrap();
        assert!(rejected.completed_date.unwrap() >= rejected.created_date);
        assert_eq!(
            rejected.rejection_reason.as_deref(),
            Some("Incomplete bank statement")
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_missing_application(pool: PgPool) {
        let service = ImmigrationService::new(pool);
        assert!(!service.delete(12).await.unwrap());
    }
}
