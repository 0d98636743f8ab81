//! Shared fixtures for the integration test suites.

#![allow(dead_code)]

use chrono::Utc;
use taskdesk::domain::{Actor, Role, Task, TaskStatus, User};

pub fn admin_actor() -> Actor {
    Actor {
        id: 1,
        role: Some(Role::Admin),
    }
}

pub fn manager_actor() -> Actor {
    Actor {
        id: 2,
        role: Some(Role::Manager),
    }
}

pub fn basic_actor(id: i64) -> Actor {
    Actor { id, role: None }
}

pub fn user(id: i64, email: &str) -> User {
    let now = Utc::now();
    User {
        id,
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo".to_string(),
        role: Role::from_email(email),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn deleted_user(id: i64, email: &str) -> User {
    let mut user = user(id, email);
    user.deleted_at = Some(Utc::now());
    user
}

pub fn pending_task(id: i64, created_by: Role) -> Task {
    let now = Utc::now();
    Task {
        id,
        title: "Write quarterly report".to_string(),
        description: "Numbers for Q3, reviewed".to_string(),
        priority: 5,
        status: TaskStatus::Pending,
        assign_to: None,
        created_by,
        due_date: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn in_progress_task(id: i64, assignee: i64) -> Task {
    let mut task = pending_task(id, Role::Manager);
    task.status = TaskStatus::InProgress;
    task.assign_to = Some(assignee);
    task.due_date = Some("25-12-2099 14:00".to_string());
    task
}

pub fn deleted_task(id: i64) -> Task {
    let mut task = pending_task(id, Role::Admin);
    task.deleted_at = Some(Utc::now());
    task
}
