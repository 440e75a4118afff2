use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::{User, UserRole};

/// Response DTO for user (never exposes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            role: u.role,
            phone_number: u.phone_number,
            address: u.address,
            profile_picture: u.profile_picture,
            is_active: u.is_active,
            created_date: u.created_at,
            updated_date: u.updated_at,
        }
    }
}

/// Request DTO for creating a user (registration)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(regex(path = *crate::shared::validation::PHONE_REGEX, message = "Invalid phone number"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 200, message = "Address must not exceed 200 characters"))]
    pub address: Option<String>,

    pub profile_picture: Option<String>,
}

/// Request DTO for updating a user profile
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(regex(path = *crate::shared::validation::PHONE_REGEX, message = "Invalid phone number"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 200, message = "Address must not exceed 200 characters"))]
    pub address: Option<String>,

    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let dto: CreateUserDto = serde_json::from_value(serde_json::json!({
            "fullName": "Jane Doe",
            "email": "not-an-email",
            "password": "abc",
            "phoneNumber": "phone"
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("phone_number"));
        assert!(!fields.contains_key("full_name"));
    }

    #[test]
    fn test_update_user_accepts_missing_optionals() {
        let dto: UpdateUserDto =
            serde_json::from_value(serde_json::json!({ "fullName": "Jane Doe" })).unwrap();
        assert!(dto.validate().is_ok());
    }
}
