use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::immigration::models::{ApplicationStatus, ImmigrationApplication};

/// Response DTO for immigration application
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImmigrationApplicationResponseDto {
    pub id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub passport_number: String,
    pub target_country: String,
    pub passport_expiry_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub documents_path: Option<String>,
    pub visa_type: Option<String>,
    pub expected_processing_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl From<ImmigrationApplication> for ImmigrationApplicationResponseDto {
    fn from(a: ImmigrationApplication) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            full_name: a.full_name,
            passport_number: a.passport_number,
            target_country: a.target_country,
            passport_expiry_date: a.passport_expiry_date,
            status: a.status,
            documents_path: a.documents_path,
            visa_type: a.visa_type,
            expected_processing_date: a.expected_processing_date,
            rejection_reason: a.rejection_reason,
            admin_notes: a.admin_notes,
            created_date: a.created_at,
            updated_date: a.updated_at,
            completed_date: a.completed_at,
        }
    }
}

/// Request DTO for creating or updating an immigration application
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveImmigrationApplicationDto {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 20, message = "Passport number must be 1-20 characters"))]
    pub passport_number: String,

    #[validate(length(min = 1, max = 100, message = "Target country must be 1-100 characters"))]
    pub target_country: String,

    pub passport_expiry_date: DateTime<Utc>,

    #[validate(length(max = 50))]
    pub visa_type: Option<String>,
}

/// Request DTO for the admin status update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusDto {
    /// Name (e.g. "UnderReview") or numeric code (0-3)
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub expected_processing_date: Option<DateTime<Utc>>,
}
