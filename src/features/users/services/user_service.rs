use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto, UserResponseDto};
use crate::features::users::models::{User, UserRole};

/// Service for user persistence
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all users, newest first
    pub async fn list_all(&self) -> Result<Vec<UserResponseDto>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<UserResponseDto> {
        self.find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<UserResponseDto> {
        self.find_by_email(email)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Email lookups are case-insensitive, matching the unique index
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user by email: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user by ID: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Whether no user holds this email yet
    pub async fn is_email_available(&self, email: &str) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check email availability: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(!taken)
    }

    /// Insert a user with an already hashed password.
    ///
    /// Duplicate emails are rejected by the unique index and surface as a conflict.
    pub async fn create(
        &self,
        dto: CreateUserDto,
        password_hash: String,
        role: UserRole,
    ) -> Result<User> {
        let email = dto.email.trim().to_string();
        let conflict = format!("Email {} is already registered", email);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, password_hash, role, phone_number, address, profile_picture)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(dto.full_name.trim())
        .bind(&email)
        .bind(password_hash)
        .bind(role)
        .bind(dto.phone_number)
        .bind(dto.address)
        .bind(dto.profile_picture)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::from_write(e, &conflict, "User not found")
        })?;

        tracing::info!("User created: id={}, role={}", user.id, user.role);

        Ok(user)
    }

    pub async fn update(&self, id: i32, dto: UpdateUserDto) -> Result<UserResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = $2, phone_number = $3, address = $4, profile_picture = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.full_name.trim())
        .bind(dto.phone_number)
        .bind(dto.address)
        .bind(dto.profile_picture)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", id)))?;

        tracing::info!("User updated: id={}", user.id);

        Ok(user.into())
    }

    pub async fn update_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update password: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    /// Delete a user and, through the foreign keys, everything they own.
    /// Returns false when no such user exists.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("User deleted: id={}", id);
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_user(email: &str) -> CreateUserDto {
        serde_json::from_value(json!({
            "fullName": "Bikash Thapa",
            "email": email,
            "password": "secret123"
        }))
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicate_email_is_conflict(pool: PgPool) {
        let service = UserService::new(pool);

        service
            .create(new_user("bikash@example.com"), "hash".to_string(), UserRole::Customer)
            .await
            .unwrap();
        assert!(!service.is_email_available("BIKASH@example.com").await.unwrap());

        let err = service
            .create(new_user("Bikash@Example.com"), "hash".to_string(), UserRole::Customer)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_reports_missing_user(pool: PgPool) {
        let service = UserService::new(pool);
        let user = service
            .create(new_user("gone@example.com"), "hash".to_string(), UserRole::Customer)
            .await
            .unwrap();

        assert!(service.delete(user.id).await.unwrap());
        assert!(!service.delete(user.id).await.unwrap());
        assert!(service.find_by_id(user.id).await.unwrap().is_none());
    }
}
