//! User repository with soft delete support.
//!
//! Query methods exclude soft-deleted rows unless named otherwise.
//! Mutations that depend on the row's current state carry their
//! precondition into the `WHERE` clause of a single `UPDATE`, so the
//! check and the write are atomic per row.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{Role, User};
use crate::errors::{AppError, AppResult};

/// User persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an active user by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find an active user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by email, including soft-deleted rows.
    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user. The role is fixed here, at creation, forever.
    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: Option<Role>,
    ) -> AppResult<User>;

    /// Apply a profile patch (name and/or password hash) to an active user.
    async fn update_profile(
        &self,
        id: i64,
        name: Option<String>,
        password_hash: Option<String>,
    ) -> AppResult<User>;

    /// Soft delete an active user (sets the tombstone timestamp).
    async fn soft_delete(&self, id: i64) -> AppResult<()>;

    /// Clear the tombstone of a soft-deleted user.
    async fn restore(&self, id: i64) -> AppResult<User>;

    /// Permanently erase a user; assigned tasks cascade at the schema level.
    async fn hard_delete(&self, id: i64) -> AppResult<()>;

    /// List active users.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// List only soft-deleted users.
    async fn list_deleted(&self) -> AppResult<Vec<User>>;
}

/// SeaORM-backed implementation of [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: i64) -> AppResult<User> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?
            .into_domain()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(user::Model::into_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(user::Model::into_domain)
            .transpose()
    }

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(user::Model::into_domain)
            .transpose()
    }

    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: Option<Role>,
    ) -> AppResult<User> {
        let now = Utc::now();
        let active = user::ActiveModel {
            name: Set(name),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role.map(|r| r.as_str().to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        active.insert(&self.db).await?.into_domain()
    }

    async fn update_profile(
        &self,
        id: i64,
        name: Option<String>,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let mut active: user::ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await?.into_domain()
    }

    async fn soft_delete(&self, id: i64) -> AppResult<()> {
        let now = Utc::now();
        let result = UserEntity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }

    async fn restore(&self, id: i64) -> AppResult<User> {
        // Precondition (currently deleted) travels in the WHERE clause
        let result = UserEntity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(None::<chrono::DateTime<Utc>>))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_not_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::invalid_state("This user isn't deleted"));
        }
        self.fetch(id).await
    }

    async fn hard_delete(&self, id: i64) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        UserEntity::find()
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(user::Model::into_domain)
            .collect()
    }

    async fn list_deleted(&self) -> AppResult<Vec<User>> {
        UserEntity::find()
            .filter(user::Column::DeletedAt.is_not_null())
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(user::Model::into_domain)
            .collect()
    }
}
