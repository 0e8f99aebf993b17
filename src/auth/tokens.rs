use chrono::{Duration, Utc};
use jsonwebtoken::{encode, decode, Header, EncodingKey, DecodingKey, Validation, Algorithm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::models::Role;
use crate::Result;

/// Claims of a short-lived access token. The role rides along so protected
/// routes can authorize without a store lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of a long-lived refresh token. Possession alone is not enough:
/// the token value must also match the one persisted for the user. The jti
/// makes every issued token distinct, so rotation always changes the value.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies the two token kinds, each with its own secret and TTL.
#[derive(Clone)]
pub struct TokenIssuer {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        access_secret: String,
        refresh_secret: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_settings(auth: &AuthConfig) -> Self {
        Self::new(
            auth.access_secret.clone(),
            auth.refresh_secret.clone(),
            Duration::minutes(auth.access_expiry_minutes),
            Duration::days(auth.refresh_expiry_days),
        )
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(&self, user_id: Uuid, role: Role) -> Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.access_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn issue_refresh(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.refresh_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims> {
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.access_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims> {
        let data = decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AuthError};

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            "access_secret".to_string(),
            "refresh_secret".to_string(),
            Duration::minutes(15),
            Duration::days(7),
        )
    }

    #[test]
    fn test_access_round_trip() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let token = issuer.issue_access(user_id, Role::Admin).unwrap();
        let claims = issuer.verify_access(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_round_trip() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let token = issuer.issue_refresh(user_id).unwrap();
        let claims = issuer.verify_refresh(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let first = issuer.issue_refresh(user_id).unwrap();
        let second = issuer.issue_refresh(user_id).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_secrets_are_not_interchangeable() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let access = issuer.issue_access(user_id, Role::User).unwrap();
        let refresh = issuer.issue_refresh(user_id).unwrap();

        assert!(matches!(
            issuer.verify_refresh(&access),
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
        assert!(matches!(
            issuer.verify_access(&refresh),
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let issuer = issuer();
        let token = issuer.issue_access(Uuid::new_v4(), Role::User).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(matches!(
            issuer.verify_access(&tampered),
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
        assert!(matches!(
            issuer.verify_access("not even a jwt"),
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
    }

    #[test]
    fn test_expired_token() {
        // Negative TTL pushes exp well past the default validation leeway.
        let issuer = TokenIssuer::new(
            "access_secret".to_string(),
            "refresh_secret".to_string(),
            Duration::minutes(-5),
            Duration::minutes(-5),
        );

        let access = issuer.issue_access(Uuid::new_v4(), Role::User).unwrap();
        assert!(matches!(
            issuer.verify_access(&access),
            Err(AppError::Auth(AuthError::TokenExpired))
        ));

        let refresh = issuer.issue_refresh(Uuid::new_v4()).unwrap();
        assert!(matches!(
            issuer.verify_refresh(&refresh),
            Err(AppError::Auth(AuthError::TokenExpired))
        ));
    }
}
