//! Task lifecycle handlers.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{TaskPatch, TaskStatus};
use crate::errors::AppResult;
use crate::infra::TaskFilter;
use crate::types::Envelope;

/// New task request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreTaskRequest {
    #[validate(length(min = 2, max = 100, message = "Title must be between 2 and 100 characters"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 256,
        message = "Description must be between 1 and 256 characters"
    ))]
    pub description: String,
    #[validate(range(min = 1, max = 10, message = "Priority must be between 1 and 10"))]
    pub priority: i32,
}

/// Partial task update; absent or blank fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 2, max = 100, message = "Title must be between 2 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(
        min = 1,
        max = 256,
        message = "Description must be between 1 and 256 characters"
    ))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Priority must be between 1 and 10"))]
    pub priority: Option<i32>,
    pub assign_to: Option<i64>,
    /// `dd-mm-yyyy hh:mm`
    pub due_date: Option<String>,
}

impl UpdateTaskRequest {
    /// Convert into a domain patch, treating blank strings as absent.
    pub fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: self.title.filter(|s| !s.trim().is_empty()),
            description: self.description.filter(|s| !s.trim().is_empty()),
            priority: self.priority,
            assign_to: self.assign_to,
            due_date: self.due_date.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Assignment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignTaskRequest {
    pub assign_to: i64,
    /// `dd-mm-yyyy hh:mm`, must be in the future
    #[validate(length(min = 1, message = "Due date is required"))]
    pub due_date: String,
}

/// Task listing filters; set filters are combined with AND
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct TaskFilterQuery {
    #[validate(range(min = 1, max = 10, message = "Priority must be between 1 and 10"))]
    pub priority: Option<i32>,
    #[validate(custom(function = validate_status))]
    pub status: Option<String>,
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    if TaskStatus::parse(value).is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("status");
        error.message = Some("The selected status is invalid".into());
        Err(error)
    }
}

impl TaskFilterQuery {
    fn into_filter(self) -> TaskFilter {
        TaskFilter {
            priority: self.priority,
            status: self.status.as_deref().and_then(TaskStatus::parse),
        }
    }
}

/// Public read-only task routes
pub fn task_public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/:id", get(show))
}

/// Authenticated task routes
pub fn task_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(store))
        .route("/my", get(my_tasks))
        .route("/deleted", get(deleted))
        .route("/:id", put(update))
        .route("/:id", delete(destroy))
        .route("/:id/assign", post(assign))
        .route("/:id/delivery", post(delivery))
        .route("/:id/restore", post(restore))
        .route("/:id/force", delete(force_destroy))
}

/// List active tasks, optionally filtered by priority and status
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "Tasks",
    params(TaskFilterQuery),
    responses((status = 200, description = "Matching tasks", body = [crate::domain::TaskResponse]))
)]
pub async fn index(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<TaskFilterQuery>,
) -> AppResult<Envelope> {
    let tasks = state.task_service.list(query.into_filter()).await?;
    Ok(Envelope::ok("tasks", tasks))
}

/// Fetch a single task
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    responses(
        (status = 200, description = "The task", body = crate::domain::TaskResponse),
        (status = 404, description = "Task not found")
    )
)]
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Envelope> {
    let task = state.task_service.get(id).await?;
    Ok(Envelope::ok("task", task))
}

/// Tasks assigned to the caller
#[utoipa::path(
    get,
    path = "/api/v1/tasks/my",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "The caller's tasks", body = [crate::domain::TaskResponse]))
)]
pub async fn my_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Envelope> {
    let tasks = state.task_service.my_tasks(&current.actor()).await?;
    Ok(Envelope::ok("tasks", tasks))
}

/// Create a pending task (admins and managers)
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    request_body = StoreTaskRequest,
    responses(
        (status = 201, description = "Task created", body = crate::domain::TaskResponse),
        (status = 401, description = "Not permitted"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn store(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<StoreTaskRequest>,
) -> AppResult<Envelope> {
    let task = state
        .task_service
        .create(
            &current.actor(),
            payload.title,
            payload.description,
            payload.priority,
        )
        .await?;
    Ok(Envelope::created("task", task))
}

/// Partially update a task
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = crate::domain::TaskResponse),
        (status = 401, description = "Not permitted"),
        (status = 404, description = "No data in request or task missing")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Envelope> {
    let task = state
        .task_service
        .update(&current.actor(), id, payload.into_patch())
        .await?;
    Ok(Envelope::ok("task", task))
}

/// Soft delete a task (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Task soft-deleted"),
        (status = 401, description = "Not permitted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn destroy(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Envelope> {
    state.task_service.delete(&current.actor(), id).await?;
    Ok(Envelope::msg("Task deleted successfully"))
}

/// List soft-deleted tasks (admins and managers)
#[utoipa::path(
    get,
    path = "/api/v1/tasks/deleted",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Soft-deleted tasks", body = [crate::domain::TaskResponse]),
        (status = 401, description = "Not permitted")
    )
)]
pub async fn deleted(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Envelope> {
    let tasks = state.task_service.list_deleted(&current.actor()).await?;
    Ok(Envelope::ok("tasks", tasks))
}

/// Restore a soft-deleted task (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{id}/restore",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Task restored", body = crate::domain::TaskResponse),
        (status = 400, description = "Task is not deleted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn restore(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Envelope> {
    let task = state.task_service.restore(&current.actor(), id).await?;
    Ok(Envelope::ok("task", task))
}

/// Permanently delete a task (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}/force",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Task permanently deleted"),
        (status = 401, description = "Not permitted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn force_destroy(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Envelope> {
    state.task_service.force_delete(&current.actor(), id).await?;
    Ok(Envelope::msg("Deleted task permanently"))
}

/// Assign a task to a basic user with a future due date
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{id}/assign",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    request_body = AssignTaskRequest,
    responses(
        (status = 200, description = "Task assigned and moved to in-progress", body = crate::domain::TaskResponse),
        (status = 400, description = "Already assigned or bad due date"),
        (status = 401, description = "Not permitted"),
        (status = 404, description = "Task or user not found")
    )
)]
pub async fn assign(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<AssignTaskRequest>,
) -> AppResult<Envelope> {
    let task = state
        .task_service
        .assign(&current.actor(), id, payload.assign_to, &payload.due_date)
        .await?;
    Ok(Envelope::ok("task", task))
}

/// Deliver an in-progress task as its assignee
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{id}/delivery",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Task delivered", body = crate::domain::TaskResponse),
        (status = 400, description = "Task is not in progress"),
        (status = 401, description = "Not the assignee"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delivery(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Envelope> {
    let task = state.task_service.delivery(&current.actor(), id).await?;
    Ok(Envelope::ok("task", task))
}
