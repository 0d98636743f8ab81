//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the authorization policy engine, all
//! independent of infrastructure concerns.

pub mod password;
pub mod policy;
pub mod task;
pub mod user;

pub use password::Password;
pub use task::{DueDate, Task, TaskPatch, TaskResponse, TaskStatus};
pub use user::{Actor, Role, User, UserResponse};
