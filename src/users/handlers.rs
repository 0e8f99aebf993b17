use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::db::models::{ProfileChanges, PublicUser, Role};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub message: String,
    pub users: Vec<PublicUser>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub role: Option<String>,
}

pub async fn create(
    caller: AuthUser,
    req: web::Json<CreateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    caller.require_admin()?;

    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation("Name and email are required".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let role = match req.role.as_deref() {
        None => Role::User,
        Some(raw) => Role::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown role: {}", raw)))?,
    };

    let user = state
        .auth
        .register(&req.name, &req.email, &req.password, role)
        .await?;

    info!("User {} created by admin {}", user.id, caller.id);
    Ok(HttpResponse::Created().json(UserDetailResponse {
        success: true,
        message: "User created".to_string(),
        user,
    }))
}

pub async fn list(caller: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    caller.require_admin()?;

    let users = state.users.list_users().await?;
    let users = users.iter().map(PublicUser::from).collect();

    Ok(HttpResponse::Ok().json(UserListResponse {
        success: true,
        message: "Users fetched".to_string(),
        users,
    }))
}

pub async fn get_detail(
    caller: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if id != caller.id {
        caller.require_admin()?;
    }

    let user = state
        .users
        .get_user_by_id(id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(UserDetailResponse {
        success: true,
        message: "User fetched".to_string(),
        user: PublicUser::from(user),
    }))
}

pub async fn update(
    caller: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    caller.require_admin()?;

    let id = path.into_inner();
    let req = req.into_inner();

    let changes = ProfileChanges {
        name: req.name,
        email: req.email,
        age: req.age,
    };
    let mut user = state.auth.update_profile(id, changes).await?;

    if let Some(raw) = req.role.as_deref() {
        let role = Role::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown role: {}", raw)))?;
        state.users.set_role(id, role).await?;
        user.role = role;
    }

    info!("User {} updated by admin {}", id, caller.id);
    Ok(HttpResponse::Ok().json(UserDetailResponse {
        success: true,
        message: "User updated".to_string(),
        user,
    }))
}

pub async fn remove(
    caller: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    caller.require_admin()?;

    let id = path.into_inner();
    if !state.users.delete_user(id).await? {
        return Err(AppError::UserNotFound);
    }

    info!("User {} deleted by admin {}", id, caller.id);
    Ok(HttpResponse::Ok().json(DeletedResponse {
        success: true,
        message: "User deleted".to_string(),
    }))
}
