use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::shared::status::wire_enum;

/// Visa application review state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type, ToSchema)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

wire_enum!(ApplicationStatus, "status" {
    Pending = 0,
    UnderReview = 1,
    Approved = 2,
    Rejected = 3,
});

impl ApplicationStatus {
    /// Approval and rejection both close the application
    pub fn stamps_completion(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

/// Database model for immigration visa application
#[derive(Debug, Clone, FromRow)]
pub struct ImmigrationApplication {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_stamp_completion() {
        assert!(ApplicationStatus::Approved.stamps_completion());
        assert!(ApplicationStatus::Rejected.stamps_completion());
        assert!(!ApplicationStatus::Pending.stamps_completion());
        assert!(!ApplicationStatus::UnderReview.stamps_completion());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "under_review".parse::<ApplicationStatus>(),
            Ok(ApplicationStatus::UnderReview)
        );
        assert_eq!(
            "UNDERREVIEW".parse::<ApplicationStatus>(),
            Ok(ApplicationStatus::UnderReview)
        );
        assert_eq!(ApplicationStatus::try_from(3), Ok(ApplicationStatus::Rejected));
        assert!(ApplicationStatus::try_from(4).is_err());
    }
}
