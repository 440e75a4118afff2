use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::labor_approvals::models::{LaborApproval, LaborApprovalStatus};
use crate::shared::money::validate_amount;

/// Response DTO for labor approval application
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LaborApprovalResponseDto {
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
    pub payment_date: Option<DateTime<Utc>>,
    pub status: LaborApprovalStatus,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl From<LaborApproval> for LaborApprovalResponseDto {
    fn from(a: LaborApproval) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            full_name: a.full_name,
            passport_number: a.passport_number,
            passport_expiry_date: a.passport_expiry_date,
            gender: a.gender,
            date_of_birth: a.date_of_birth,
            permanent_address: a.permanent_address,
            current_address: a.current_address,
            destination_country: a.destination_country,
            recruiting_agency: a.recruiting_agency,
            company_name: a.company_name,
            job_category: a.job_category,
            visa_type: a.visa_type,
            offered_salary: a.offered_salary,
            contract_duration: a.contract_duration,
            documents_path: a.documents_path,
            has_police_clearance: a.has_police_clearance,
            has_medical_certificate: a.has_medical_certificate,
            has_training_certificate: a.has_training_certificate,
            application_fee: a.application_fee,
            service_charge: a.service_charge,
            total_fee: a.total_fee,
            is_fee_paid: a.is_fee_paid,
            payment_reference: a.payment_reference,
            payment_date: a.paid_at,
            status: a.status,
            admin_notes: a.admin_notes,
            rejection_reason: a.rejection_reason,
            approved_date: a.approved_at,
            completed_date: a.completed_at,
            created_date: a.created_at,
            updated_date: a.updated_at,
        }
    }
}

/// Request DTO for submitting a labor approval application
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLaborApprovalDto {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 20, message = "Passport number must be 1-20 characters"))]
    pub passport_number: String,

    pub passport_expiry_date: DateTime<Utc>,

    #[validate(length(min = 1, max = 50, message = "Gender must be 1-50 characters"))]
    pub gender: String,

    pub date_of_birth: DateTime<Utc>,

    #[validate(length(min = 1, max = 200, message = "Permanent address must be 1-200 characters"))]
    pub permanent_address: String,

    #[validate(length(min = 1, max = 100, message = "Current address must be 1-100 characters"))]
    pub current_address: String,

    #[validate(length(min = 1, max = 100, message = "Destination country must be 1-100 characters"))]
    pub destination_country: String,

    #[validate(length(min = 1, max = 100, message = "Recruiting agency must be 1-100 characters"))]
    pub recruiting_agency: String,

    #[validate(length(min = 1, max = 100, message = "Company name must be 1-100 characters"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 100, message = "Job category must be 1-100 characters"))]
    pub job_category: String,

    #[validate(length(min = 1, max = 50, message = "Visa type must be 1-50 characters"))]
    pub visa_type: String,

    #[validate(custom(function = "validate_amount"))]
    pub offered_salary: Decimal,

    #[validate(length(max = 20, message = "Contract duration must not exceed 20 characters"))]
    pub contract_duration: Option<String>,

    #[serde(default)]
    pub has_police_clearance: bool,

    #[serde(default)]
    pub has_medical_certificate: bool,

    #[serde(default)]
    pub has_training_certificate: bool,
}

/// Request DTO for the admin status update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLaborApprovalStatusDto {
    /// Status name (e.g. "FeePaid") or numeric code (0-7)
    pub status: LaborApprovalStatus,

    #[validate(length(max = 500, message = "Admin notes must not exceed 500 characters"))]
    pub admin_notes: Option<String>,

    #[validate(length(max = 500, message = "Rejection reason must not exceed 500 characters"))]
    pub rejection_reason: Option<String>,
}

/// Request DTO for paying the application fee
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LaborApprovalPaymentDto {
    #[validate(length(min = 1, max = 100, message = "Payment reference must be 1-100 characters"))]
    pub payment_reference: String,

    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
}

/// Fee calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdownDto {
    pub application_fee: Decimal,
    pub service_charge: Decimal,
    pub total_fee: Decimal,
    pub country: String,
    pub job_category: String,
}

/// Query parameters for the fee calculator
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalculateFeeQuery {
    /// Destination country (e.g. "Qatar")
    pub country: String,
    /// Job category (e.g. "Technician")
    pub job_category: String,
    /// Offered monthly salary
    pub salary: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_dto_accepts_numbers() {
        let dto: LaborApprovalPaymentDto = serde_json::from_value(serde_json::json!({
            "paymentReference": "ESEWA-001",
            "amount": 14000.50
        }))
        .unwrap();
        assert_eq!(dto.amount, Decimal::new(1400050, 2));
        assert!(dto.validate().is_ok());
    }

    fn application(salary: serde_json::Value) -> CreateLaborApprovalDto {
        serde_json::from_value(serde_json::json!({
            "fullName": "Ram Bahadur",
            "passportNumber": "PA1234567",
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

    #[test]
    fn test_negative_salary_fails_validation() {
        let dto = application(serde_json::json!(-1));

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("offered_salary"));
        assert!(!dto.has_police_clearance);
    }

    #[test]
    fn test_salary_must_fit_column() {
        assert!(application(serde_json::json!(9999999999.99)).validate().is_ok());

        let errors = application(serde_json::json!(100000000000i64))
            .validate()
            .unwrap_err();
        let salary_errors = &errors.field_errors()["offered_salary"];
        assert_eq!(salary_errors[0].code, "out_of_range");
    }

    #[test]
    fn test_payment_amount_must_fit_column() {
        let dto: LaborApprovalPaymentDto = serde_json::from_value(serde_json::json!({
            "paymentReference": "ESEWA-002",
            "amount": 100000000000i64
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_status_dto_accepts_name_or_code() {
        let by_code: UpdateLaborApprovalStatusDto =
            serde_json::from_value(serde_json::json!({ "status": 5 })).unwrap();
        let by_name: UpdateLaborApprovalStatusDto =
            serde_json::from_value(serde_json::json!({ "status": "approved" })).unwrap();
        assert_eq!(by_code.status, LaborApprovalStatus::Approved);
        assert_eq!(by_name.status, LaborApprovalStatus::Approved);
    }

    #[test]
    fn test_fee_breakdown_serializes_camel_case_numbers() {
        let json = serde_json::to_value(FeeBreakdownDto {
            application_fee: Decimal::from(10000),
            service_charge: Decimal::from(4000),
            total_fee: Decimal::from(14000),
            country: "Qatar".to_string(),
            job_category: "Technician".to_string(),
        })
        .unwrap();
        assert_eq!(json["totalFee"].as_f64(), Some(14000.0));
        assert_eq!(json["jobCategory"], "Technician");
    }
}
