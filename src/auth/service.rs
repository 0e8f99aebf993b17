use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::TokenIssuer;
use crate::db::models::{ProfileChanges, PublicUser, Role, User};
use crate::db::UserStore;
use crate::error::{AppError, AuthError};
use crate::Result;

/// Tokens and public fields returned by a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// A refreshed access token plus the rotated refresh token.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session and account logic over the credential store.
///
/// Sessions follow the single-session model: the store holds at most one
/// live refresh token per user, and every login, refresh, or logout replaces
/// or clears it with one atomic write.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenIssuer, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<PublicUser> {
        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailExists.into());
        }

        let hash = hash_password(password, self.bcrypt_cost).await?;
        let user = User::new(name.to_string(), email.to_string(), hash, role);
        let created = self.store.create_user(&user).await?;

        Ok(PublicUser::from(created))
    }

    /// Unknown email and wrong password collapse into the same error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let role = user.role_kind();
        let access_token = self.tokens.issue_access(user.id, role)?;
        let refresh_token = self.tokens.issue_refresh(user.id)?;

        // Overwrites any prior session; the previous refresh token is dead
        // from this point on.
        self.store
            .set_refresh_token(user.id, Some(refresh_token.clone()))
            .await?;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            user: PublicUser::from(user),
        })
    }

    /// Exchanges a presented refresh token for a fresh access token and a
    /// rotated refresh token. The presented value must both carry a valid
    /// signature and exactly match the stored one; a mismatch means the
    /// session was ended or the token was superseded.
    pub async fn refresh(&self, presented: Option<&str>) -> Result<RefreshOutcome> {
        let presented = presented.ok_or(AuthError::MissingToken)?;

        let claims = self.tokens.verify_refresh(presented)?;
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AppError::Auth(AuthError::TokenInvalid))?;

        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::SessionRevoked)?;

        match user.refresh_token.as_deref() {
            Some(stored) if stored == presented => {}
            _ => return Err(AuthError::SessionRevoked.into()),
        }

        let access_token = self.tokens.issue_access(user.id, user.role_kind())?;
        let refresh_token = self.tokens.issue_refresh(user.id)?;
        self.store
            .set_refresh_token(user.id, Some(refresh_token.clone()))
            .await?;

        Ok(RefreshOutcome {
            access_token,
            refresh_token,
        })
    }

    /// Ends the session. Safe to call when none exists.
    pub async fn logout(&self, user_id: Uuid) -> Result<()> {
        self.store.set_refresh_token(user_id, None).await
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<PublicUser> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(PublicUser::from(user))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<PublicUser> {
        if let Some(email) = changes.email.as_deref() {
            // Updating to one's own current email is allowed; only a
            // collision with a different user is rejected.
            if self.store.email_taken_by_other(email, user_id).await? {
                return Err(AuthError::EmailExists.into());
            }
        }

        let user = self
            .store
            .update_profile(user_id, &changes)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(PublicUser::from(user))
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !verify_password(old_password, &user.password_hash).await? {
            return Err(AuthError::InvalidPassword.into());
        }

        let hash = hash_password(new_password, self.bcrypt_cost).await?;
        self.store.set_password_hash(user_id, &hash).await
    }
}
