//! Persistence layer.
//!
//! The credential and project stores are traits so the handlers and the
//! auth service stay agnostic of the backing database; [`DbOperations`] is
//! the Postgres implementation.

pub mod models;
pub mod operations;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;

pub use models::{Project, ProjectChanges, ProfileChanges, PublicUser, Role, User};
pub use operations::DbOperations;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    /// True when `email` belongs to a user other than `user_id`.
    async fn email_taken_by_other(&self, email: &str, user_id: Uuid) -> Result<bool>;

    /// Applies the non-`None` fields; returns the updated record, or `None`
    /// when the id does not resolve.
    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<User>>;

    async fn set_role(&self, id: Uuid, role: Role) -> Result<()>;

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<()>;

    /// Single atomic write of the stored refresh token; `None` ends the
    /// session. Last write wins under concurrent login/logout.
    async fn set_refresh_token(&self, id: Uuid, token: Option<String>) -> Result<()>;

    /// Returns whether a record was actually removed.
    async fn delete_user(&self, id: Uuid) -> Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, project: &Project) -> Result<Project>;

    async fn list_projects(&self) -> Result<Vec<Project>>;

    async fn get_project_by_id(&self, id: Uuid) -> Result<Option<Project>>;

    async fn update_project(&self, id: Uuid, changes: &ProjectChanges) -> Result<Option<Project>>;

    async fn delete_project(&self, id: Uuid) -> Result<bool>;
}
