use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::db::models::{Project, ProjectChanges};
use crate::error::{AppError, AuthError};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub success: bool,
    pub message: String,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub success: bool,
    pub message: String,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Owner and admins may mutate a project; everyone else is rejected.
fn authorize_mutation(project: &Project, caller: &AuthUser) -> Result<(), AppError> {
    if caller.is_admin() || project.owner_id == Some(caller.id) {
        Ok(())
    } else {
        Err(AuthError::Forbidden.into())
    }
}

pub async fn create(
    caller: AuthUser,
    req: web::Json<CreateProjectRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Project name is required".to_string()));
    }

    // An explicit owner must resolve to a real user; without one the
    // project belongs to the caller.
    let owner_id = match req.owner_id {
        Some(owner_id) => {
            state
                .users
                .get_user_by_id(owner_id)
                .await?
                .ok_or(AppError::UserNotFound)?;
            owner_id
        }
        None => caller.id,
    };

    let project = Project::new(req.name, req.description.unwrap_or_default(), Some(owner_id));
    let created = state.projects.create_project(&project).await?;

    info!("Project {} created by user {}", created.id, caller.id);
    Ok(HttpResponse::Created().json(ProjectDetailResponse {
        success: true,
        message: "Project created".to_string(),
        project: created,
    }))
}

pub async fn list(_caller: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.projects.list_projects().await?;

    Ok(HttpResponse::Ok().json(ProjectListResponse {
        success: true,
        message: "Projects fetched".to_string(),
        projects,
    }))
}

pub async fn get_detail(
    _caller: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let project = state
        .projects
        .get_project_by_id(path.into_inner())
        .await?
        .ok_or(AppError::ProjectNotFound)?;

    Ok(HttpResponse::Ok().json(ProjectDetailResponse {
        success: true,
        message: "Project fetched".to_string(),
        project,
    }))
}

pub async fn update(
    caller: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateProjectRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let project = state
        .projects
        .get_project_by_id(id)
        .await?
        .ok_or(AppError::ProjectNotFound)?;
    authorize_mutation(&project, &caller)?;

    let req = req.into_inner();
    let changes = ProjectChanges {
        name: req.name,
        description: req.description,
    };
    let updated = state
        .projects
        .update_project(id, &changes)
        .await?
        .ok_or(AppError::ProjectNotFound)?;

    info!("Project {} updated by user {}", id, caller.id);
    Ok(HttpResponse::Ok().json(ProjectDetailResponse {
        success: true,
        message: "Project updated".to_string(),
        project: updated,
    }))
}

pub async fn remove(
    caller: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let project = state
        .projects
        .get_project_by_id(id)
        .await?
        .ok_or(AppError::ProjectNotFound)?;
    authorize_mutation(&project, &caller)?;

    state.projects.delete_project(id).await?;

    info!("Project {} deleted by user {}", id, caller.id);
    Ok(HttpResponse::Ok().json(DeletedResponse {
        success: true,
        message: "Project deleted".to_string(),
    }))
}
