//! Task service - the task lifecycle state machine.
//!
//! Every operation follows the same shape: resolve the target row,
//! consult the policy engine, then mutate through the repository. The
//! repositories re-check state preconditions inside their conditional
//! writes, so policy results that were true at read time cannot be
//! raced stale.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::domain::{policy, Actor, DueDate, Task, TaskPatch, TaskResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::{TaskFilter, TaskRepository, UserRepository};

/// Task-related use cases.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// List active tasks matching the conjunction of set filters.
    ///
    /// An empty result is a success with an empty list, never an error.
    async fn list(&self, filter: TaskFilter) -> AppResult<Vec<TaskResponse>>;

    /// Tasks assigned to the caller.
    async fn my_tasks(&self, actor: &Actor) -> AppResult<Vec<TaskResponse>>;

    /// Fetch a single active task.
    async fn get(&self, id: i64) -> AppResult<TaskResponse>;

    /// Create a pending task; the creator's role is recorded on it.
    async fn create(
        &self,
        actor: &Actor,
        title: String,
        description: String,
        priority: i32,
    ) -> AppResult<TaskResponse>;

    /// Partial update. Absent and blank fields are ignored; an empty
    /// effective patch is `NoChange`.
    async fn update(&self, actor: &Actor, id: i64, patch: TaskPatch) -> AppResult<TaskResponse>;

    /// Soft delete (admin only).
    async fn delete(&self, actor: &Actor, id: i64) -> AppResult<()>;

    /// Soft-deleted tasks (admins and managers).
    async fn list_deleted(&self, actor: &Actor) -> AppResult<Vec<TaskResponse>>;

    /// Restore a soft-deleted task (admin only).
    async fn restore(&self, actor: &Actor, id: i64) -> AppResult<TaskResponse>;

    /// Permanently erase a task, active or soft-deleted (admin only).
    async fn force_delete(&self, actor: &Actor, id: i64) -> AppResult<()>;

    /// Assign an unassigned task to a basic user with a future due
    /// date; moves the task to `in-progress`.
    async fn assign(
        &self,
        actor: &Actor,
        id: i64,
        assign_to: i64,
        due_date_raw: &str,
    ) -> AppResult<TaskResponse>;

    /// Deliver an in-progress task as its assignee; moves it to `done`
    /// and stamps `due_date` with the delivery time.
    async fn delivery(&self, actor: &Actor, id: i64) -> AppResult<TaskResponse>;
}

/// Concrete implementation of [`TaskService`].
pub struct TaskManager {
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserRepository>,
}

impl TaskManager {
    pub fn new(tasks: Arc<dyn TaskRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tasks, users }
    }

    async fn fetch_active(&self, id: i64) -> AppResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))
    }
}

#[async_trait]
impl TaskService for TaskManager {
    async fn list(&self, filter: TaskFilter) -> AppResult<Vec<TaskResponse>> {
        let tasks = self.tasks.list(filter).await?;
        Ok(tasks.iter().map(TaskResponse::from).collect())
    }

    async fn my_tasks(&self, actor: &Actor) -> AppResult<Vec<TaskResponse>> {
        let tasks = self.tasks.list_by_assignee(actor.id).await?;
        Ok(tasks.iter().map(TaskResponse::from).collect())
    }

    async fn get(&self, id: i64) -> AppResult<TaskResponse> {
        Ok(TaskResponse::from(self.fetch_active(id).await?))
    }

    async fn create(
        &self,
        actor: &Actor,
        title: String,
        description: String,
        priority: i32,
    ) -> AppResult<TaskResponse> {
        policy::can_create_task(actor)?;
        let created_by = actor
            .role
            .ok_or_else(|| AppError::denied("Only admins and managers can create tasks"))?;

        let task = self
            .tasks
            .create(title, description, priority, created_by)
            .await?;
        tracing::info!(task_id = task.id, created_by = %created_by, "task created");
        Ok(TaskResponse::from(task))
    }

    async fn update(&self, actor: &Actor, id: i64, patch: TaskPatch) -> AppResult<TaskResponse> {
        let task = self.fetch_active(id).await?;
        policy::can_update_task(actor, &task)?;

        if patch.is_empty() {
            return Err(AppError::NoChange);
        }

        let mut patch = patch;
        // An assignee arriving through the generic patch must still exist
        if let Some(target_id) = patch.assign_to {
            if self.users.find_by_id(target_id).await?.is_none() {
                return Err(AppError::not_found("User not found"));
            }
        }
        // Normalize any due date through the wire format
        if let Some(ref raw) = patch.due_date {
            patch.due_date = Some(DueDate::parse(raw)?.format());
        }

        let updated = self.tasks.update_fields(id, patch).await?;
        Ok(TaskResponse::from(updated))
    }

    async fn delete(&self, actor: &Actor, id: i64) -> AppResult<()> {
        policy::can_delete_task(actor)?;
        // Resolve first so a missing task reads as 404, not a policy error
        self.fetch_active(id).await?;
        self.tasks.soft_delete(id).await?;
        tracing::info!(task_id = id, "task soft-deleted");
        Ok(())
    }

    async fn list_deleted(&self, actor: &Actor) -> AppResult<Vec<TaskResponse>> {
        policy::can_view_deleted_tasks(actor)?;
        let tasks = self.tasks.list_deleted().await?;
        Ok(tasks.iter().map(TaskResponse::from).collect())
    }

    async fn restore(&self, actor: &Actor, id: i64) -> AppResult<TaskResponse> {
        policy::can_restore_task(actor)?;

        let task = self
            .tasks
            .find_by_id_with_deleted(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        if !task.is_deleted() {
            return Err(AppError::invalid_state("This task isn't deleted"));
        }

        let restored = self.tasks.restore(id).await?;
        Ok(TaskResponse::from(restored))
    }

    async fn force_delete(&self, actor: &Actor, id: i64) -> AppResult<()> {
        policy::can_force_delete_task(actor)?;

        // Active rows first, then soft-deleted ones
        let task = match self.tasks.find_by_id(id).await? {
            Some(task) => task,
            None => self
                .tasks
                .find_by_id_with_deleted(id)
                .await?
                .ok_or_else(|| AppError::not_found("Task Not Found"))?,
        };

        self.tasks.hard_delete(task.id).await?;
        tracing::warn!(task_id = id, "task permanently deleted");
        Ok(())
    }

    async fn assign(
        &self,
        actor: &Actor,
        id: i64,
        assign_to: i64,
        due_date_raw: &str,
    ) -> AppResult<TaskResponse> {
        let task = self.fetch_active(id).await?;
        let target = self
            .users
            .find_by_id(assign_to)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        policy::can_assign_task(actor, &task, &target)?;

        let due_date = DueDate::parse(due_date_raw)?;
        if !due_date.is_future(Utc::now()) {
            return Err(AppError::invalid_state("Due date must be a future date"));
        }

        // The repository re-checks assign_to IS NULL in the same statement
        let assigned = self.tasks.assign(id, assign_to, due_date.format()).await?;
        tracing::info!(task_id = id, assign_to, "task assigned");
        Ok(TaskResponse::from(assigned))
    }

    async fn delivery(&self, actor: &Actor, id: i64) -> AppResult<TaskResponse> {
        let task = self.fetch_active(id).await?;
        policy::can_deliver_task(actor, &task)?;

        let delivered_at = DueDate::now_string(Utc::now());
        let delivered = self.tasks.deliver(id, actor.id, delivered_at).await?;
        tracing::info!(task_id = id, "task delivered");
        Ok(TaskResponse::from(delivered))
    }
}
