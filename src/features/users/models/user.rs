use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::shared::status::wire_enum;

/// Role carried on the user row and in the token's `role` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Customer,
}

wire_enum!(UserRole, "role" {
    Admin = 0,
    Customer = 1,
});

/// Database model for user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_accepts_name_or_code() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("1".parse::<UserRole>(), Ok(UserRole::Customer));
        assert_eq!(serde_json::to_value(UserRole::Customer).unwrap(), "Customer");
        assert_eq!(
            "Agent".parse::<UserRole>(),
            Err("Invalid role: Agent".to_string())
        );
    }
}
