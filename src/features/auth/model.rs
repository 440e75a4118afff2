use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::users::models::UserRole;

/// Identity resolved from a validated bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins may act on any row, everyone else only on their own
    pub fn can_access(&self, owner_id: i32) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    pub fn ensure_can_access(&self, owner_id: i32) -> Result<()> {
        if self.can_access(owner_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You do not have access to this resource".to_string(),
            ))
        }
    }

    /// Resolve the owner for a create call: the caller unless an explicit id is given
    pub fn resolve_owner(&self, requested: Option<i32>) -> Result<i32> {
        let owner_id = requested.unwrap_or(self.user_id);
        self.ensure_can_access(owner_id)?;
        Ok(owner_id)
    }
}

/// JWT claims issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iss: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 7,
            email: "jane@alfatravels.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_customer_limited_to_own_rows() {
        let customer = user(UserRole::Customer);
        assert!(customer.can_access(7));
        assert!(!customer.can_access(8));
        assert!(matches!(
            customer.ensure_can_access(8),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_accesses_everything() {
        let admin = user(UserRole::Admin);
        assert!(admin.can_access(8));
        assert_eq!(admin.resolve_owner(Some(42)).unwrap(), 42);
    }

    #[test]
    fn test_resolve_owner_defaults_to_caller() {
        let customer = user(UserRole::Customer);
        assert_eq!(customer.resolve_owner(None).unwrap(), 7);
        assert_eq!(customer.resolve_owner(Some(7)).unwrap(), 7);
        assert!(customer.resolve_owner(Some(3)).is_err());
    }
}
