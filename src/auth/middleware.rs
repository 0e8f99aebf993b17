use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::db::models::Role;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// Identity extracted from a bearer access token.
///
/// Verification is stateless: only the signature and expiry are checked, the
/// credential store is never consulted. A revoked account can therefore keep
/// using a live access token until it expires.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden.into())
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_identity(req))
    }
}

fn extract_identity(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::NotAuthorized)?;

    let claims = state.auth.token_issuer().verify_access(token)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Auth(AuthError::TokenInvalid))?;

    Ok(AuthUser {
        id,
        role: claims.role,
    })
}
