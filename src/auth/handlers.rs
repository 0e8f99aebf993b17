use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::middleware::AuthUser;
use crate::db::models::{ProfileChanges, PublicUser, Role};
use crate::error::{AppError, AuthError};
use crate::AppState;

/// Cookie carrying the refresh token between browser and server. Never
/// readable from scripts, never sent cross-site.
pub const REFRESH_COOKIE: &str = "refreshToken";

fn refresh_cookie(token: String, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(ttl.num_seconds()))
        .finish()
}

fn clear_refresh_cookie() -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::ZERO)
        .finish()
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub access_token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let role = match req.role.as_deref() {
        None => Role::User,
        Some(raw) => Role::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown role: {}", raw)))?,
    };

    let user = state
        .auth
        .register(&req.name, &req.email, &req.password, role)
        .await?;

    info!("Registration successful for email: {}", req.email);
    Ok(HttpResponse::Created().json(RegisterResponse {
        success: true,
        message: "Registration successful".to_string(),
        user,
    }))
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);

    let outcome = match state.auth.login(&req.email, &req.password).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Login failed for email: {}", req.email);
            return Err(e);
        }
    };

    info!("Login successful for email: {}", req.email);
    let cookie = refresh_cookie(
        outcome.refresh_token,
        state.auth.token_issuer().refresh_ttl(),
    );

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        access_token: outcome.access_token,
        user: outcome.user,
    }))
}

pub async fn refresh(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let presented = req.cookie(REFRESH_COOKIE);
    let outcome = state
        .auth
        .refresh(presented.as_ref().map(|c| c.value()))
        .await?;

    let cookie = refresh_cookie(
        outcome.refresh_token,
        state.auth.token_issuer().refresh_ttl(),
    );

    Ok(HttpResponse::Ok().cookie(cookie).json(RefreshResponse {
        success: true,
        message: "Token refreshed".to_string(),
        access_token: outcome.access_token,
    }))
}

pub async fn logout(
    user: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.auth.logout(user.id).await?;

    info!("Logout successful for user: {}", user.id);
    Ok(HttpResponse::Ok()
        .cookie(clear_refresh_cookie())
        .json(MessageResponse {
            success: true,
            message: "Logout successful".to_string(),
        }))
}

pub async fn me(user: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let profile = state.auth.current_user(user.id).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        success: true,
        message: "Profile fetched".to_string(),
        user: profile,
    }))
}

pub async fn update_profile(
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    if let Some(email) = req.email.as_deref() {
        validate_email(email)?;
    }

    let changes = ProfileChanges {
        name: req.name,
        email: req.email,
        age: req.age,
    };
    let updated = state.auth.update_profile(user.id, changes).await?;

    info!("Profile updated for user: {}", user.id);
    Ok(HttpResponse::Ok().json(UserResponse {
        success: true,
        message: "Profile updated".to_string(),
        user: updated,
    }))
}

pub async fn change_password(
    user: AuthUser,
    req: web::Json<ChangePasswordRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let old_password = req.old_password.as_deref().unwrap_or("");
    let new_password = req.new_password.as_deref().unwrap_or("");
    if old_password.is_empty() || new_password.is_empty() {
        return Err(AuthError::MissingPassword.into());
    }
    validate_password(new_password)?;

    state
        .auth
        .change_password(user.id, old_password, new_password)
        .await?;

    info!("Password changed for user: {}", user.id);
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Password changed".to_string(),
    }))
}
