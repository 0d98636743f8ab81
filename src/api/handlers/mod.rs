//! HTTP request handlers.

pub mod auth_handler;
pub mod task_handler;
pub mod user_handler;
