use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;
use crate::features::users::models::User;

/// A signed access token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Signs HS256 access tokens for authenticated users
pub struct TokenService {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_secs: config.token_ttl.as_secs(),
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(format!("System clock error: {}", e)))?
            .as_secs();

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign token: {:?}", e);
                AppError::Internal(format!("Failed to sign token: {}", e))
            })?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::JwtValidator;
    use crate::features::users::models::UserRole;
    use chrono::Utc;
    use std::time::Duration;

    fn config(secret: &str, ttl: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: "alfa-travels".to_string(),
            audience: "alfa-travels-web".to_string(),
            token_ttl: Duration::from_secs(ttl),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn user(role: UserRole) -> User {
        User {
            id: 12,
            full_name: "Jane Smith".to_string(),
            email: "jane@alfatravels.com".to_string(),
            password_hash: String::new(),
            role,
            phone_number: None,
            address: None,
            profile_picture: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    const SECRET: &str = "a-test-secret-that-is-long-enough-to-use";

    #[test]
    fn test_issued_token_validates_to_same_identity() {
        let config = config(SECRET, 3600);
        let issued = TokenService::new(&config).issue(&user(UserRole::Admin)).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let identity = JwtValidator::new(&config).validate_token(&issued.token).unwrap();
        assert_eq!(identity.user_id, 12);
        assert_eq!(identity.email, "jane@alfatravels.com");
        assert_eq!(identity.role, UserRole::Admin);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issued = TokenService::new(&config("another-secret-that-is-also-long-enough", 3600))
            .issue(&user(UserRole::Customer))
            .unwrap();

        let result = JwtValidator::new(&config(SECRET, 3600)).validate_token(&issued.token);
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let config = config(SECRET, 3600);
        let issued = TokenService::new(&config).issue(&user(UserRole::Customer)).unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged_payload = "eyJzdWIiOiIxIn0";
        parts[1] = forged_payload;
        let forged = parts.join(".");

        assert!(JwtValidator::new(&config).validate_token(&forged).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = config(SECRET, 0);
        let mut claims_user = user(UserRole::Customer);
        claims_user.id = 3;
        let issued = TokenService::new(&config).issue(&claims_user).unwrap();

        // ttl of zero puts exp at iat; wait past it so the zero-leeway check fails
        std::thread::sleep(Duration::from_millis(1100));
        assert!(JwtValidator::new(&config).validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let config = config(SECRET, 3600);
        assert!(JwtValidator::new(&config).validate_token("not-a-jwt").is_err());
    }
}
