#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use actix_web::web;
use projecthub_server::db::models::{Project, ProjectChanges, ProfileChanges, Role, User};
use projecthub_server::error::{AppError, DatabaseError};
use projecthub_server::{AppState, ProjectStore, Settings, UserStore};

/// In-memory stand-in for the Postgres store, mirroring its observable
/// behavior (unique email index included) so the HTTP suites run without a
/// database.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    projects: RwLock<HashMap<Uuid, Project>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &User) -> projecthub_server::Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Database(DatabaseError::Duplicate));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_user_by_id(&self, id: Uuid) -> projecthub_server::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> projecthub_server::Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> projecthub_server::Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn email_taken_by_other(
        &self,
        email: &str,
        user_id: Uuid,
    ) -> projecthub_server::Result<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.email == email && u.id != user_id))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> projecthub_server::Result<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(age) = changes.age {
            user.age = age;
        }
        user.updated_at = chrono::Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_role(&self, id: Uuid, role: Role) -> projecthub_server::Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.role = role.as_str().to_string();
        }
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> projecthub_server::Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.password_hash = hash.to_string();
        }
        Ok(())
    }

    async fn set_refresh_token(
        &self,
        id: Uuid,
        token: Option<String>,
    ) -> projecthub_server::Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.refresh_token = token;
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> projecthub_server::Result<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, project: &Project) -> projecthub_server::Result<Project> {
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn list_projects(&self) -> projecthub_server::Result<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.read().await.values().cloned().collect();
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    async fn get_project_by_id(&self, id: Uuid) -> projecthub_server::Result<Option<Project>> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: &ProjectChanges,
    ) -> projecthub_server::Result<Option<Project>> {
        let mut projects = self.projects.write().await;
        let Some(project) = projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            project.name = name.clone();
        }
        if let Some(description) = &changes.description {
            project.description = description.clone();
        }
        project.updated_at = chrono::Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> projecthub_server::Result<bool> {
        Ok(self.projects.write().await.remove(&id).is_some())
    }
}

/// Application state over a fresh in-memory store.
pub fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let store = Arc::new(MemoryStore::default());
    web::Data::new(AppState::with_stores(config, store.clone(), store))
}
