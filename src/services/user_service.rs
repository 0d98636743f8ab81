//! User service - profile, soft-delete lifecycle and the admin
//! oversight view.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::domain::{policy, Actor, Password, Role, TaskResponse, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::{TaskRepository, UserRepository};

/// A user together with a projection of their tasks, for the
/// admin-only oversight listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithTasks {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub tasks: Vec<TaskResponse>,
}

/// User-related use cases. The acting caller is always an explicit
/// parameter; services hold no ambient identity.
#[async_trait]
pub trait UserService: Send + Sync {
    /// The caller's own profile. Role is always present, null for
    /// basic users.
    async fn profile(&self, actor: &Actor) -> AppResult<UserResponse>;

    /// Apply a profile patch (name and/or password). Absent or blank
    /// fields are ignored; an empty effective patch is `NoChange`.
    async fn update_profile(
        &self,
        target_id: i64,
        name: Option<String>,
        password: Option<String>,
    ) -> AppResult<()>;

    /// Soft delete the caller's own account (self-service).
    async fn soft_delete(&self, actor: &Actor) -> AppResult<()>;

    /// Restore a soft-deleted user looked up by email.
    async fn restore(&self, email: &str) -> AppResult<()>;

    /// Permanently erase a user by email (admin only). Cascades their
    /// assigned tasks at the schema level.
    async fn force_delete(&self, actor: &Actor, email: &str) -> AppResult<()>;

    /// Every user with their tasks (admin only).
    async fn list_all(&self, actor: &Actor) -> AppResult<Vec<UserWithTasks>>;

    /// Soft-deleted users (admins and managers).
    async fn list_deleted(&self, actor: &Actor) -> AppResult<Vec<UserResponse>>;
}

/// Concrete implementation of [`UserService`].
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { users, tasks }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn profile(&self, actor: &Actor) -> AppResult<UserResponse> {
        let user = self
            .users
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(UserResponse::from(user))
    }

    async fn update_profile(
        &self,
        target_id: i64,
        name: Option<String>,
        password: Option<String>,
    ) -> AppResult<()> {
        // Blank strings count as absent, never as "clear the field"
        let name = name.filter(|s| !s.trim().is_empty());
        let password = password.filter(|s| !s.trim().is_empty());

        if name.is_none() && password.is_none() {
            return Err(AppError::NoChange);
        }

        let password_hash = match password {
            Some(plain) => Some(Password::new(&plain)?.into_string()),
            None => None,
        };

        self.users
            .update_profile(target_id, name, password_hash)
            .await?;
        Ok(())
    }

    async fn soft_delete(&self, actor: &Actor) -> AppResult<()> {
        self.users.soft_delete(actor.id).await?;
        tracing::info!(user_id = actor.id, "user soft-deleted own account");
        Ok(())
    }

    async fn restore(&self, email: &str) -> AppResult<()> {
        let user = self
            .users
            .find_by_email_with_deleted(email)
            .await?
            .ok_or_else(|| AppError::not_found("User Not Found"))?;

        if !user.is_deleted() {
            return Err(AppError::invalid_state("This user isn't deleted"));
        }

        self.users.restore(user.id).await?;
        Ok(())
    }

    async fn force_delete(&self, actor: &Actor, email: &str) -> AppResult<()> {
        policy::can_force_delete_user(actor)?;

        // Look among active rows first, then among soft-deleted ones
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => self
                .users
                .find_by_email_with_deleted(email)
                .await?
                .ok_or_else(|| AppError::not_found("User Not Found"))?,
        };

        self.users.hard_delete(user.id).await?;
        tracing::warn!(user_id = user.id, "user permanently deleted");
        Ok(())
    }

    async fn list_all(&self, actor: &Actor) -> AppResult<Vec<UserWithTasks>> {
        policy::can_list_all_users(actor)?;

        let users = self.users.list().await?;
        let mut result = Vec::with_capacity(users.len());
        for user in users {
            let tasks = self.tasks.list_by_assignee(user.id).await?;
            result.push(UserWithTasks {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                tasks: tasks.iter().map(TaskResponse::from).collect(),
            });
        }
        Ok(result)
    }

    async fn list_deleted(&self, actor: &Actor) -> AppResult<Vec<UserResponse>> {
        policy::can_view_deleted_users(actor)?;
        let users = self.users.list_deleted().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
