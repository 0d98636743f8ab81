//! SeaORM entity for the `users` table.

use sea_orm::entity::prelude::*;

use crate::domain::{Role, User};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Map the row to the domain entity.
    ///
    /// A stored role string outside the known set is treated as data
    /// corruption, not as a basic user.
    pub fn into_domain(self) -> AppResult<User> {
        let role = match self.role {
            Some(ref s) => Some(
                Role::parse(s)
                    .ok_or_else(|| AppError::internal(format!("unknown role in storage: {}", s)))?,
            ),
            None => None,
        };

        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}
