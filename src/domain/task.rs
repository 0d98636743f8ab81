//! Task domain entity, status state machine and due-date format.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::DUE_DATE_FORMAT;
use crate::domain::Role;
use crate::errors::{AppError, AppResult};

/// Task status state machine:
/// `pending --(assign)--> in-progress --(delivery)--> done`.
///
/// No transition leaves `done` and none returns to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task due date in the wire format `dd-mm-yyyy hh:mm`.
///
/// Dates cross the API boundary (and are stored) only in this text
/// form, never as raw timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDate(NaiveDateTime);

impl DueDate {
    /// Parse a raw due date string.
    pub fn parse(raw: &str) -> AppResult<DueDate> {
        NaiveDateTime::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
            .map(DueDate)
            .map_err(|_| {
                AppError::validation("Invalid due date format, please use dd-mm-yyyy hh:mm")
            })
    }

    /// True when this due date is strictly after `now`.
    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.0 > now.naive_utc()
    }

    /// Render the wire/storage form.
    pub fn format(&self) -> String {
        self.0.format(DUE_DATE_FORMAT).to_string()
    }

    /// The current instant in due-date text form (delivery timestamps).
    pub fn now_string(now: DateTime<Utc>) -> String {
        now.naive_utc().format(DUE_DATE_FORMAT).to_string()
    }
}

/// Task domain entity.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub status: TaskStatus,
    /// Assigned basic user, if any. Set at most once while null.
    pub assign_to: Option<i64>,
    /// Role of the creating user. Only role-holders create tasks.
    pub created_by: Role,
    /// Always in `dd-mm-yyyy hh:mm` form; the assignment deadline until
    /// delivery, the completion timestamp afterward.
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_assigned(&self) -> bool {
        self.assign_to.is_some()
    }
}

/// Task projection returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub created_by: Role,
    pub description: String,
    pub priority: i32,
    pub status: TaskStatus,
    pub due_date: Option<String>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            created_by: task.created_by,
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            due_date: task.due_date.clone(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

/// Effective field-level patch for a task update.
///
/// `None` means "leave the field alone"; there is no way to clear a
/// field through an update. Services build this from request input by
/// dropping absent and blank values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub assign_to: Option<i64>,
    pub due_date: Option<String>,
}

impl TaskPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assign_to.is_none()
            && self.due_date.is_none()
    }
}
