//! TaskDesk - role-based task management API.
//!
//! Users register with an email whose shape decides their role
//! (`@admin` and `@manager` markers, everyone else is a basic user).
//! Admins and managers create tasks, assign them to basic users with a
//! future due date, and basic users deliver them. Both users and tasks
//! are soft-deleted and restorable.
//!
//! Layers, outermost first:
//! - [`api`]: axum routing, handlers, extractors and middleware
//! - [`services`]: use cases behind trait objects
//! - [`domain`]: entities, value objects and the pure policy engine
//! - [`infra`]: sea-orm repositories and migrations

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
