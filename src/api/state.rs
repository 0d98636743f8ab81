//! Shared application state.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::infra::{TaskStore, UserStore};
use crate::services::{
    AuthService, Authenticator, TaskManager, TaskService, UserManager, UserService,
};

/// Everything the handlers need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub task_service: Arc<dyn TaskService>,
}

impl AppState {
    /// Wire the production dependency graph onto a live connection.
    pub fn from_connection(conn: DatabaseConnection, config: Config) -> Self {
        let users = Arc::new(UserStore::new(conn.clone()));
        let tasks = Arc::new(TaskStore::new(conn));

        Self {
            auth_service: Arc::new(Authenticator::new(users.clone(), config)),
            user_service: Arc::new(UserManager::new(users.clone(), tasks.clone())),
            task_service: Arc::new(TaskManager::new(tasks, users)),
        }
    }

    /// Assemble state from pre-built services, used by tests with mocks.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        task_service: Arc<dyn TaskService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            task_service,
        }
    }
}
