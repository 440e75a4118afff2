use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{ChangePasswordRequestDto, LoginRequestDto, LoginResponseDto};
use crate::features::auth::services::TokenService;
use crate::features::users::dtos::{CreateUserDto, UserResponseDto};
use crate::features::users::models::UserRole;
use crate::features::users::services::UserService;
use crate::shared::constants::PASSWORD_HASH_COST;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for registration, login and password changes
pub struct AuthService {
    users: Arc<UserService>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Register a new customer account
    pub async fn register(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        let password_hash = hash_password(dto.password.clone()).await?;
        let user = self
            .users
            .create(dto, password_hash, UserRole::Customer)
            .await?;

        tracing::info!("User registered: id={}", user.id);

        Ok(user.into())
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown email, wrong password and deactivated accounts all yield the same error.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(dto.password, user.password_hash.clone()).await? {
            tracing::warn!("Failed login attempt for user id={}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            tracing::warn!("Login attempt for inactive user id={}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let issued = self.tokens.issue(&user)?;

        tracing::info!("User logged in: id={}", user.id);

        Ok(LoginResponseDto {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            profile_picture: user.profile_picture,
            token: issued.token,
            expires_in: issued.expires_in,
        })
    }

    pub async fn change_password(&self, user_id: i32, dto: ChangePasswordRequestDto) -> Result<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(dto.current_password, user.password_hash).await? {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(dto.new_password).await?;
        self.users.update_password_hash(user_id, new_hash).await?;

        tracing::info!("Password changed for user id={}", user_id);

        Ok(())
    }
}

/// bcrypt is CPU-bound, so it runs on the blocking pool
pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_HASH_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("Customer@123".to_string()).await.unwrap();
        assert_ne!(hash, "Customer@123");
        assert!(verify_password("Customer@123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }
}
