//! Task repository with soft delete support.
//!
//! The single-fire lifecycle writes (`assign`, `deliver`, `restore`)
//! put their state precondition into the `WHERE` clause of one
//! `UPDATE` and check `rows_affected`, so two concurrent callers can
//! never both pass the precondition.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::task::{self, Entity as TaskEntity};
use crate::domain::{Role, Task, TaskPatch, TaskStatus};
use crate::errors::{AppError, AppResult};

/// Optional listing filters, combined as a conjunction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub priority: Option<i32>,
    pub status: Option<TaskStatus>,
}

/// Task persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List active tasks matching every set filter (all tasks when none set).
    async fn list(&self, filter: TaskFilter) -> AppResult<Vec<Task>>;

    /// List active tasks assigned to the given user.
    async fn list_by_assignee(&self, user_id: i64) -> AppResult<Vec<Task>>;

    /// Find an active task by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Task>>;

    /// Find a task by ID, including soft-deleted rows.
    async fn find_by_id_with_deleted(&self, id: i64) -> AppResult<Option<Task>>;

    /// Insert a new pending task recording the creator's role.
    async fn create(
        &self,
        title: String,
        description: String,
        priority: i32,
        created_by: Role,
    ) -> AppResult<Task>;

    /// Apply a non-empty field patch to an active task.
    async fn update_fields(&self, id: i64, patch: TaskPatch) -> AppResult<Task>;

    /// Soft delete an active task.
    async fn soft_delete(&self, id: i64) -> AppResult<()>;

    /// Clear the tombstone of a soft-deleted task.
    async fn restore(&self, id: i64) -> AppResult<Task>;

    /// Permanently erase a task (active or soft-deleted).
    async fn hard_delete(&self, id: i64) -> AppResult<()>;

    /// List only soft-deleted tasks.
    async fn list_deleted(&self) -> AppResult<Vec<Task>>;

    /// Atomically assign an unassigned active task: sets assignee, due
    /// date and `in-progress` status iff `assign_to` is still null.
    async fn assign(&self, id: i64, user_id: i64, due_date: String) -> AppResult<Task>;

    /// Atomically deliver an in-progress task: sets `done` and stamps
    /// `due_date` with the delivery time iff the task is still
    /// in-progress and assigned to `assignee`.
    async fn deliver(&self, id: i64, assignee: i64, delivered_at: String) -> AppResult<Task>;
}

/// SeaORM-backed implementation of [`TaskRepository`].
pub struct TaskStore {
    db: DatabaseConnection,
}

impl TaskStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: i64) -> AppResult<Task> {
        TaskEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?
            .into_domain()
    }
}

#[async_trait]
impl TaskRepository for TaskStore {
    async fn list(&self, filter: TaskFilter) -> AppResult<Vec<Task>> {
        let mut query = TaskEntity::find().filter(task::Column::DeletedAt.is_null());

        if let Some(priority) = filter.priority {
            query = query.filter(task::Column::Priority.eq(priority));
        }
        if let Some(status) = filter.status {
            query = query.filter(task::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_asc(task::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(task::Model::into_domain)
            .collect()
    }

    async fn list_by_assignee(&self, user_id: i64) -> AppResult<Vec<Task>> {
        TaskEntity::find()
            .filter(task::Column::AssignTo.eq(user_id))
            .filter(task::Column::DeletedAt.is_null())
            .order_by_asc(task::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(task::Model::into_domain)
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Task>> {
        TaskEntity::find_by_id(id)
            .filter(task::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(task::Model::into_domain)
            .transpose()
    }

    async fn find_by_id_with_deleted(&self, id: i64) -> AppResult<Option<Task>> {
        TaskEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(task::Model::into_domain)
            .transpose()
    }

    async fn create(
        &self,
        title: String,
        description: String,
        priority: i32,
        created_by: Role,
    ) -> AppResult<Task> {
        let now = Utc::now();
        let active = task::ActiveModel {
            title: Set(title),
            description: Set(description),
            priority: Set(priority),
            status: Set(TaskStatus::Pending.as_str().to_string()),
            assign_to: Set(None),
            created_by: Set(created_by.as_str().to_string()),
            due_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        active.insert(&self.db).await?.into_domain()
    }

    async fn update_fields(&self, id: i64, patch: TaskPatch) -> AppResult<Task> {
        let model = TaskEntity::find_by_id(id)
            .filter(task::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        let mut active: task::ActiveModel = model.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority);
        }
        if let Some(assign_to) = patch.assign_to {
            active.assign_to = Set(Some(assign_to));
        }
        if let Some(due_date) = patch.due_date {
            active.due_date = Set(Some(due_date));
        }
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await?.into_domain()
    }

    async fn soft_delete(&self, id: i64) -> AppResult<()> {
        let now = Utc::now();
        let result = TaskEntity::update_many()
            .col_expr(task::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(task::Column::UpdatedAt, Expr::value(now))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Task not found"));
        }
        Ok(())
    }

    async fn restore(&self, id: i64) -> AppResult<Task> {
        let result = TaskEntity::update_many()
            .col_expr(
                task::Column::DeletedAt,
                Expr::value(None::<chrono::DateTime<Utc>>),
            )
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::DeletedAt.is_not_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::invalid_state("This task isn't deleted"));
        }
        self.fetch(id).await
    }

    async fn hard_delete(&self, id: i64) -> AppResult<()> {
        let result = TaskEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Task not found"));
        }
        Ok(())
    }

    async fn list_deleted(&self) -> AppResult<Vec<Task>> {
        TaskEntity::find()
            .filter(task::Column::DeletedAt.is_not_null())
            .order_by_asc(task::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(task::Model::into_domain)
            .collect()
    }

    async fn assign(&self, id: i64, user_id: i64, due_date: String) -> AppResult<Task> {
        // Single-fire: only succeeds while assign_to is still null
        let result = TaskEntity::update_many()
            .col_expr(task::Column::AssignTo, Expr::value(Some(user_id)))
            .col_expr(task::Column::DueDate, Expr::value(Some(due_date)))
            .col_expr(
                task::Column::Status,
                Expr::value(TaskStatus::InProgress.as_str()),
            )
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::AssignTo.is_null())
            .filter(task::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::invalid_state(
                "This task is already assigned to a user",
            ));
        }
        self.fetch(id).await
    }

    async fn deliver(&self, id: i64, assignee: i64, delivered_at: String) -> AppResult<Task> {
        let result = TaskEntity::update_many()
            .col_expr(task::Column::Status, Expr::value(TaskStatus::Done.as_str()))
            .col_expr(task::Column::DueDate, Expr::value(Some(delivered_at)))
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Status.eq(TaskStatus::InProgress.as_str()))
            .filter(task::Column::AssignTo.eq(assignee))
            .filter(task::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::invalid_state("Task status is not in-progress"));
        }
        self.fetch(id).await
    }
}
