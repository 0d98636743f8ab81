//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations and repositories.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{TaskFilter, TaskRepository, TaskStore, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockTaskRepository, MockUserRepository};
