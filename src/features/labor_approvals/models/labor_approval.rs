use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::status::wire_enum;

/// Labor approval (Shram Swikriti) lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type, ToSchema)]
#[sqlx(type_name = "labor_approval_status", rename_all = "snake_case")]
pub enum LaborApprovalStatus {
    Pending,
    UnderReview,
    DocumentsVerified,
    FeePending,
    FeePaid,
    Approved,
    Rejected,
    Completed,
}

wire_enum!(LaborApprovalStatus, "status" {
    Pending = 0,
    UnderReview = 1,
    DocumentsVerified = 2,
    FeePending = 3,
    FeePaid = 4,
    Approved = 5,
    Rejected = 6,
    Completed = 7,
});

impl LaborApprovalStatus {
    pub fn stamps_approval(self) -> bool {
        self == LaborApprovalStatus::Approved
    }

    pub fn stamps_completion(self) -> bool {
        self == LaborApprovalStatus::Completed
    }
}

/// Database model for labor approval application
#[derive(Debug, Clone, FromRow)]
pub struct LaborApproval {
    pub id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub passport_number: String,
    pub passport_expiry_date: DateTime<Utc>,
    pub gender: String,
    pub date_of_birth: DateTime<Utc>,
    pub permanent_address: String,
    pub current_address: String,
    pub destination_country: String,
    pub recruiting_agency: String,
    pub company_name: String,
    pub job_category: String,
    pub visa_type: String,
    pub offered_salary: Decimal,
    pub contract_duration: Option<String>,
    pub documents_path: Option<String>,
    pub has_police_clearance: bool,
    pub has_medical_certificate: bool,
    pub has_training_certificate: bool,
    pub application_fee: Decimal,
    pub service_charge: Decimal,
    pub total_fee: Decimal,
    pub is_fee_paid: bool,
    pub payment_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub status: LaborApprovalStatus,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LaborApproval {
    /// Reasons a payment of `amount` by `payer` cannot be applied to this row.
    ///
    /// Checked in order: ownership, already paid, insufficient amount.
    pub fn check_payment(&self, payer: &AuthenticatedUser, amount: Decimal) -> Result<()> {
        payer.ensure_can_access(self.user_id)?;

        if self.is_fee_paid {
            return Err(AppError::BadRequest(
                "Payment already processed".to_string(),
            ));
        }

        if amount < self.total_fee {
            return Err(AppError::BadRequest(
                "Insufficient payment amount".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;

    fn dec(rupees: i64) -> Decimal {
        Decimal::from(rupees)
    }

    fn application(is_fee_paid: bool, total_fee: i64) -> LaborApproval {
        let now = Utc::now();
        LaborApproval {
            id: 1,
            user_id: 10,
            full_name: "Ram Bahadur".to_string(),
            passport_number: "PA1234567".to_string(),
            passport_expiry_date: now,
            gender: "Male".to_string(),
            date_of_birth: now,
            permanent_address: "Kathmandu".to_string(),
            current_address: "Kathmandu".to_string(),
            destination_country: "Qatar".to_string(),
            recruiting_agency: "Himalayan Manpower".to_string(),
            company_name: "Doha Builders".to_string(),
            job_category: "Technician".to_string(),
            visa_type: "Work".to_string(),
            offered_salary: dec(40000),
            contract_duration: None,
            documents_path: None,
            has_police_clearance: true,
            has_medical_certificate: true,
            has_training_certificate: false,
            application_fee: dec(10000),
            service_charge: dec(4000),
            total_fee: dec(total_fee),
            is_fee_paid,
            payment_reference: None,
            paid_at: None,
            status: LaborApprovalStatus::Pending,
            admin_notes: None,
            rejection_reason: None,
            approved_at: None,
            completed_at: None,
            created_at: now,
            updated_at: None,
        }
    }

    fn payer(user_id: i32, role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            email: "payer@example.com".to_string(),
            role,
        }
    }

    fn message(result: Result<()>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_amount_is_accepted() {
        let app = application(false, 14000);
        assert!(app.check_payment(&payer(10, UserRole::Customer), dec(14000)).is_ok());
        assert!(app.check_payment(&payer(10, UserRole::Customer), dec(20000)).is_ok());
    }

    #[test]
    fn test_insufficient_amount_is_rejected() {
        let app = application(false, 14000);
        let amount = Decimal::new(1399999, 2);
        assert_eq!(
            message(app.check_payment(&payer(10, UserRole::Customer), amount)),
            "Insufficient payment amount"
        );
    }

    #[test]
    fn test_already_paid_wins_over_amount() {
        let app = application(true, 14000);
        assert_eq!(
            message(app.check_payment(&payer(10, UserRole::Customer), dec(1))),
            "Payment already processed"
        );
    }

    #[test]
    fn test_other_customer_cannot_pay() {
        let app = application(false, 14000);
        assert!(matches!(
            app.check_payment(&payer(11, UserRole::Customer), dec(14000)),
            Err(AppError::Forbidden(_))
        ));
        assert!(app.check_payment(&payer(99, UserRole::Admin), dec(14000)).is_ok());
    }

    #[test]
    fn test_status_codes_and_stamps() {
        assert_eq!("feepaid".parse::<LaborApprovalStatus>(), Ok(LaborApprovalStatus::FeePaid));
        assert_eq!("documents_verified".parse::<LaborApprovalStatus>(), Ok(LaborApprovalStatus::DocumentsVerified));
        assert_eq!(LaborApprovalStatus::try_from(7), Ok(LaborApprovalStatus::Completed));
        assert!(LaborApprovalStatus::try_from(8).is_err());
        assert!(LaborApprovalStatus::Approved.stamps_approval());
        assert!(!LaborApprovalStatus::Approved.stamps_completion());
        assert!(LaborApprovalStatus::Completed.stamps_completion());
        assert!(!LaborApprovalStatus::FeePaid.stamps_approval());
    }
}
