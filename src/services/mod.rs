//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate the policy engine, domain entities and
//! repositories to fulfill application use cases. They depend on
//! repository traits for dependency inversion, and every call takes
//! the acting user explicitly.

mod auth_service;
mod task_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use task_service::{TaskManager, TaskService};
pub use user_service::{UserManager, UserService, UserWithTasks};
