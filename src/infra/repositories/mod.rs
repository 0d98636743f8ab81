//! Repository layer - Data access abstraction
//!
//! Repositories abstract persistence behind traits so services depend
//! on behavior, not on SeaORM.

pub(crate) mod entities;
mod task_repository;
mod user_repository;

pub use task_repository::{TaskFilter, TaskRepository, TaskStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use task_repository::MockTaskRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
