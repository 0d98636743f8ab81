//! Authorization policy engine.
//!
//! Stateless decision functions gating every mutating operation. Each
//! returns `Ok(())` or a [`Denial`] carrying a machine-checkable reason;
//! services translate denials into the error taxonomy (and thereby into
//! HTTP statuses). Nothing here touches storage or ambient state.

use crate::domain::{Actor, Role, Task, TaskStatus, User};
use crate::errors::AppError;

/// Why a policy check refused an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The actor's role does not permit the action.
    Unauthorized(&'static str),
    /// The target entity is not in a state that allows the action.
    WrongState(&'static str),
    /// The task already has an assignee.
    AlreadyAssigned,
}

impl Denial {
    fn unauthorized(msg: &'static str) -> Result<(), Denial> {
        Err(Denial::Unauthorized(msg))
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthorized(msg) => AppError::denied(msg),
            Denial::WrongState(msg) => AppError::invalid_state(msg),
            Denial::AlreadyAssigned => {
                AppError::invalid_state("This task is already assigned to a user")
            }
        }
    }
}

/// Only administrators may list every user with their tasks.
pub fn can_list_all_users(actor: &Actor) -> Result<(), Denial> {
    if actor.is_admin() {
        Ok(())
    } else {
        Denial::unauthorized("Can't access to this permission")
    }
}

/// Admins and managers may browse soft-deleted users.
pub fn can_view_deleted_users(actor: &Actor) -> Result<(), Denial> {
    if actor.has_role() {
        Ok(())
    } else {
        Denial::unauthorized("You can't access to this permission")
    }
}

/// Admins and managers may browse soft-deleted tasks.
pub fn can_view_deleted_tasks(actor: &Actor) -> Result<(), Denial> {
    if actor.has_role() {
        Ok(())
    } else {
        Denial::unauthorized("You can't access to this permission")
    }
}

/// Any role-holder may create tasks; basic users may not.
pub fn can_create_task(actor: &Actor) -> Result<(), Denial> {
    if actor.has_role() {
        Ok(())
    } else {
        Denial::unauthorized("Only admins and managers can create tasks")
    }
}

/// Role-holders may update tasks; managers only those a manager created.
///
/// The manager restriction compares the creator's *role*, not identity:
/// any manager may edit any manager-created task.
pub fn can_update_task(actor: &Actor, task: &Task) -> Result<(), Denial> {
    if !actor.has_role() {
        return Denial::unauthorized("Only admins and managers can update tasks");
    }
    if actor.role == Some(Role::Manager) && task.created_by != Role::Manager {
        return Denial::unauthorized("This task was not created by a manager");
    }
    Ok(())
}

/// Soft-deleting a task is admin-only.
pub fn can_delete_task(actor: &Actor) -> Result<(), Denial> {
    if actor.is_admin() {
        Ok(())
    } else {
        Denial::unauthorized("Can't access delete permission")
    }
}

/// Restoring a soft-deleted task is admin-only.
pub fn can_restore_task(actor: &Actor) -> Result<(), Denial> {
    if actor.is_admin() {
        Ok(())
    } else {
        Denial::unauthorized("Can't access restore permission")
    }
}

/// Permanently erasing a task is admin-only.
pub fn can_force_delete_task(actor: &Actor) -> Result<(), Denial> {
    if actor.is_admin() {
        Ok(())
    } else {
        Denial::unauthorized("Can't access force delete permission")
    }
}

/// Permanently erasing a user is admin-only.
pub fn can_force_delete_user(actor: &Actor) -> Result<(), Denial> {
    if actor.is_admin() {
        Ok(())
    } else {
        Denial::unauthorized("Can't access force delete permission")
    }
}

/// A role-holder may assign an unassigned task to a basic user.
pub fn can_assign_task(actor: &Actor, task: &Task, target: &User) -> Result<(), Denial> {
    if !actor.has_role() {
        return Denial::unauthorized("Only admins and managers can assign tasks");
    }
    if task.is_assigned() {
        return Err(Denial::AlreadyAssigned);
    }
    if target.role.is_some() {
        return Denial::unauthorized("Can't assign task to this user");
    }
    Ok(())
}

/// Only the assigned basic user may deliver an in-progress task.
pub fn can_deliver_task(actor: &Actor, task: &Task) -> Result<(), Denial> {
    if actor.has_role() {
        return Denial::unauthorized("Only the assigned user can deliver a task");
    }
    if task.status != TaskStatus::InProgress {
        return Err(Denial::WrongState("Task status is not in-progress"));
    }
    if task.assign_to != Some(actor.id) {
        return Denial::unauthorized("This task is assigned to another user");
    }
    Ok(())
}
