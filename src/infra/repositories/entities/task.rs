//! SeaORM entity for the `user_tasks` table.

use sea_orm::entity::prelude::*;

use crate::domain::{Role, Task, TaskStatus};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub status: String,
    pub assign_to: Option<i64>,
    pub created_by: String,
    /// Stored in `dd-mm-yyyy hh:mm` text form, matching the wire format.
    pub due_date: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignTo",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Map the row to the domain entity.
    pub fn into_domain(self) -> AppResult<Task> {
        let status = TaskStatus::parse(&self.status)
            .ok_or_else(|| AppError::internal(format!("unknown task status in storage: {}", self.status)))?;
        let created_by = Role::parse(&self.created_by).ok_or_else(|| {
            AppError::internal(format!("unknown creator role in storage: {}", self.created_by))
        })?;

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status,
            assign_to: self.assign_to,
            created_by,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}
