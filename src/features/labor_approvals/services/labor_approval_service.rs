use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::labor_approvals::dtos::{
    CreateLaborApprovalDto, LaborApprovalPaymentDto, LaborApprovalResponseDto,
    UpdateLaborApprovalStatusDto,
};
use crate::features::labor_approvals::models::{LaborApproval, LaborApprovalStatus};
use crate::features::labor_approvals::services::fee_calculator::calculate_fee;
use crate::shared::money::round_to_cents;

const NOT_FOUND: &str = "Application not found";

/// Service for labor approval (Shram Swikriti) applications
pub struct LaborApprovalService {
    pool: PgPool,
}

impl LaborApprovalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all applications, newest first
    pub async fn list_all(&self) -> Result<Vec<LaborApprovalResponseDto>> {
        let applications = sqlx::query_as::<_, LaborApproval>(
            "SELECT * FROM labor_approvals ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list labor approvals: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(applications.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<LaborApprovalResponseDto>> {
        let applications = sqlx::query_as::<_, LaborApproval>(
            "SELECT * FROM labor_approvals WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list labor approvals by user: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(applications.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<LaborApprovalResponseDto> {
        self.find(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    async fn find(&self, id: i32) -> Result<Option<LaborApproval>> {
        sqlx::query_as::<_, LaborApproval>("SELECT * FROM labor_approvals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get labor approval by ID: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Submit an application. The fee is computed here and frozen on the row.
    pub async fn create(
        &self,
        user_id: i32,
        dto: CreateLaborApprovalDto,
    ) -> Result<LaborApprovalResponseDto> {
        let offered_salary = round_to_cents(dto.offered_salary);
        let fee = calculate_fee(&dto.destination_country, &dto.job_category, offered_salary);

        let application = sqlx::query_as::<_, LaborApproval>(
            r#"
            INSERT INTO labor_approvals (
                user_id, full_name, passport_number, passport_expiry_date, gender, date_of_birth,
                permanent_address, current_address, destination_country, recruiting_agency,
                company_name, job_category, visa_type, offered_salary, contract_duration,
                has_police_clearance, has_medical_certificate, has_training_certificate,
                application_fee, service_charge, total_fee, status
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22
            )
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&dto.full_name)
        .bind(&dto.passport_number)
        .bind(dto.passport_expiry_date)
        .bind(&dto.gender)
        .bind(dto.date_of_birth)
        .bind(&dto.permanent_address)
        .bind(&dto.current_address)
        .bind(&dto.destination_country)
        .bind(&dto.recruiting_agency)
        .bind(&dto.company_name)
        .bind(&dto.job_category)
        .bind(&dto.visa_type)
        .bind(offered_salary)
        .bind(&dto.contract_duration)
        .bind(dto.has_police_clearance)
        .bind(dto.has_medical_certificate)
        .bind(dto.has_training_certificate)
        .bind(fee.application_fee)
        .bind(fee.service_charge)
        .bind(fee.total_fee)
        .bind(LaborApprovalStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create labor approval: {:?}", e);
            AppError::from_write(
                e,
                "Labor approval already exists",
                &format!("User with ID {} not found", user_id),
            )
        })?;

        tracing::info!(
            "Labor approval created: id={}, user={}, total_fee={}",
            application.id,
            user_id,
            application.total_fee
        );

        Ok(application.into())
    }

    /// Admin status write. Any transition is allowed; Approved and Completed stamp
    /// their timestamps from the database clock.
    pub async fn update_status(
        &self,
        id: i32,
        dto: UpdateLaborApprovalStatusDto,
    ) -> Result<LaborApprovalResponseDto> {
        let application = sqlx::query_as::<_, LaborApproval>(
            r#"
            UPDATE labor_approvals
            SET status = $2,
                admin_notes = $3,
                rejection_reason = $4,
                updated_at = NOW(),
                approved_at = CASE WHEN $5 THEN NOW() ELSE approved_at END,
                completed_at = CASE WHEN $6 THEN NOW() ELSE completed_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(&dto.admin_notes)
        .bind(&dto.rejection_reason)
        .bind(dto.status.stamps_approval())
        .bind(dto.status.stamps_completion())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update labor approval status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

        if application.status == LaborApprovalStatus::Approved && !application.is_fee_paid {
            tracing::warn!(
                "Labor approval {} approved before its fee was paid",
                application.id
            );
        }

        tracing::info!(
            "Labor approval status updated: id={}, status={}",
            application.id,
            application.status
        );

        Ok(application.into())
    }

    /// Record the fee payment as a single compare-and-set.
    ///
    /// The row is only updated while unpaid, owned by (or administered by) the payer and
    /// with a total the amount covers. When nothing is updated the current row is read
    /// back to report why.
    pub async fn process_payment(
        &self,
        id: i32,
        payer: &AuthenticatedUser,
        dto: LaborApprovalPaymentDto,
    ) -> Result<LaborApprovalResponseDto> {
        let updated = sqlx::query_as::<_, LaborApproval>(
            r#"
            UPDATE labor_approvals
            SET is_fee_paid = TRUE,
                payment_reference = $2,
                paid_at = NOW(),
                status = $3,
                updated_at = NOW()
            WHERE id = $1
              AND is_fee_paid = FALSE
              AND total_fee <= $4
              AND (user_id = $5 OR $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.payment_reference)
        .bind(LaborApprovalStatus::FeePaid)
        .bind(dto.amount)
        .bind(payer.user_id)
        .bind(payer.is_admin())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to process labor approval payment: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(application) = updated {
            tracing::info!(
                "Labor approval fee paid: id={}, reference={}",
                application.id,
                dto.payment_reference
            );
            return Ok(application.into());
        }

        let current = self
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

        current.check_payment(payer, dto.amount)?;

        // The guard passes only if the row changed between the two statements
        tracing::warn!("Labor approval {} changed during payment", id);
        Err(AppError::Conflict(
            "Application changed while processing payment, please retry".to_string(),
        ))
    }

    /// Returns false when no such application exists
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM labor_approvals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete labor approval: {:?}", e);
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Labor approval deleted: id={}", id);
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{authenticated, insert_user};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn application(passport: &str, salary: serde_json::Value) -> CreateLaborApprovalDto {
        serde_json::from_value(json!({
            "fullName": "Ram Bahadur",
            "passportNumber": passport,
            "passportExpiryDate": "2030-01-01T00:00:00Z",
            "gender": "Male",
            "dateOfBirth": "1995-05-05T00:00:00Z",
            "permanentAddress": "Gorkha",
            "currentAddress": "Kathmandu",
            "destinationCountry": "Qatar",
            "recruitingAgency": "Himalayan Manpower",
            "companyName": "Doha Builders",
            "jobCategory": "Technician",
            "visaType": "Work",
            "offeredSalary": salary
        }))
        .unwrap()
    }

    fn payment(reference: &str, amount: i64) -> LaborApprovalPaymentDto {
        LaborApprovalPaymentDto {
            payment_reference: reference.to_string(),
            amount: Decimal::from(amount),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_stored_fee_matches_stored_salary(pool: PgPool) {
        let user_id = insert_user(&pool, "worker@example.com", UserRole::Customer).await;
        let service = LaborApprovalService::new(pool);

        let created = service
            .create(user_id, application("PA1000001", json!(30000.004)))
            .await
            .unwrap();

        assert_eq!(created.offered_salary, Decimal::new(3000000, 2));
        let recomputed = calculate_fee("Qatar", "Technician", created.offered_salary);
        assert_eq!(created.total_fee, recomputed.total_fee);
        assert_eq!(created.total_fee, Decimal::from(13000));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_payment_is_applied_once(pool: PgPool) {
        let user_id = insert_user(&pool, "payer@example.com", UserRole::Customer).await;
        let payer = authenticated(user_id, UserRole::Customer);
        let service = LaborApprovalService::new(pool);

        let created = service
            .create(user_id, application("PA1000002", json!(40000)))
            .await
            .unwrap();
        assert_eq!(created.total_fee, Decimal::from(14000));

        let err = service
            .process_payment(created.id, &payer, payment("ESEWA-1", 13999))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Insufficient payment amount");
        assert!(!service.get_by_id(created.id).await.unwrap().is_fee_paid);

        let paid = service
            .process_payment(created.id, &payer, payment("ESEWA-2", 14000))
            .await
            .unwrap();
        assert!(paid.is_fee_paid);
        assert_eq!(paid.status, LaborApprovalStatus::FeePaid);
        assert_eq!(paid.payment_reference.as_deref(), Some("ESEWA-2"));
        assert!(paid.payment_date.is_some());

        let err = service
            .process_payment(created.id, &payer, payment("ESEWA-3", 14000))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Payment already processed");
        assert_eq!(
            service
                .get_by_id(created.id)
                .await
                .unwrap()
                .payment_reference
                .as_deref(),
            Some("ESEWA-2")
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_payment_by_other_customer_is_forbidden(pool: PgPool) {
        let owner = insert_user(&pool, "owner@example.com", UserRole::Customer).await;
        let other = insert_user(&pool, "other@example.com", UserRole::Customer).await;
        let service = LaborApprovalService::new(pool);

        let created = service
            .create(owner, application("PA1000003", json!(20000)))
            .await
            .unwrap();

        let err = service
            .process_payment(
                created.id,
                &authenticated(other, UserRole::Customer),
                payment("ESEWA-4", 100000),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(!service.get_by_id(created.id).await.unwrap().is_fee_paid);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_payment_for_missing_application(pool: PgPool) {
        let admin = insert_user(&pool, "boss@example.com", UserRole::Admin).await;
        let service = LaborApprovalService::new(pool);

        let err = service
            .process_payment(999, &authenticated(admin, UserRole::Admin), payment("X", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_completion_and_approval_are_stamped(pool: PgPool) {
        let user_id = insert_user(&pool, "stamp@example.com", UserRole::Customer).await;
        let service = LaborApprovalService::new(pool);
        let created = service
            .create(user_id, application("PA1000004", json!(25000)))
            .await
            .unwrap();
        assert!(created.completed_date.is_none());

        let status = |status| UpdateLaborApprovalStatusDto {
            status,
            admin_notes: None,
            rejection_reason: None,
        };

        let approved = service
            .update_status(created.id, status(LaborApprovalStatus::Approved))
            .await
            .unwrap();
        assert!(approved.approved_date.is_some());
        assert!(approved.completed_date.is_none());

        let completed = service
            .update_status(created.id, status(LaborApprovalStatus::Completed))
            .await
            .unwrap();
        let completed_at = completed.completed_date.unwrap();
        assert!(completed_at >= completed.created_date);
        assert_eq!(completed.approved_date, approved.approved_date);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_for_missing_user_is_not_found(pool: PgPool) {
        let service = LaborApprovalService::new(pool);

        let err = service
            .create(4242, application("PA1000005", json!(25000)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found: User with ID 4242 not found");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_reports_missing_row(pool: PgPool) {
        let user_id = insert_user(&pool, "delete@example.com", UserRole::Customer).await;
        let service = LaborApprovalService::new(pool);
        let created = service
            .create(user_id, application("PA1000006", json!(25000)))
            .await
            .unwrap();

        assert!(service.delete(created.id).await.unwrap());
        assert!(!service.delete(created.id).await.unwrap());
    }
}
