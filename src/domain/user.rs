//! User domain entity and role model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ADMIN_EMAIL_MARKER, MANAGER_EMAIL_MARKER, ROLE_ADMIN, ROLE_MANAGER};

/// User roles. A user with no role at all is a "basic user": the only
/// kind of user a task may be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
}

impl Role {
    /// Derive the role for a new registration from the email address.
    ///
    /// Deterministic and pure: an email containing `@admin` registers an
    /// administrator, `@manager` a manager, anything else a basic user.
    /// This is the only place a role is ever assigned; there is no API
    /// to change it afterward.
    pub fn from_email(email: &str) -> Option<Role> {
        if email.contains(ADMIN_EMAIL_MARKER) {
            Some(Role::Admin)
        } else if email.contains(MANAGER_EMAIL_MARKER) {
            Some(Role::Manager)
        } else {
            None
        }
    }

    /// Parse a stored role string.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_MANAGER => Some(Role::Manager),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Manager => ROLE_MANAGER,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity.
///
/// `role` is set once at registration and never mutated; no setter exists.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if user is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Actor view of this user for policy decisions.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }
}

/// The authenticated caller, threaded explicitly into every service call.
///
/// Carrying the actor as a parameter (rather than ambient request state)
/// keeps the policy engine pure and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: Option<Role>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// True for admins and managers alike.
    pub fn has_role(&self) -> bool {
        self.role.is_some()
    }
}

/// User profile response (safe to return to client).
///
/// `role` is always present, rendered as null for basic users.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_derivation_is_deterministic() {
        assert_eq!(Role::from_email("alice@admin.co"), Some(Role::Admin));
        assert_eq!(Role::from_email("bob@manager.io"), Some(Role::Manager));
        assert_eq!(Role::from_email("carol@example.com"), None);
        // Same input, same output
        assert_eq!(
            Role::from_email("alice@admin.co"),
            Role::from_email("alice@admin.co")
        );
    }

    #[test]
    fn admin_marker_wins_over_manager() {
        // Both substrings present: the admin check runs first
        assert_eq!(Role::from_email("x@admin.manager.com"), Some(Role::Admin));
    }

    #[test]
    fn role_round_trips_through_storage_string() {
        assert_eq!(Role::parse(Role::Admin.as_str()), Some(Role::Admin));
        assert_eq!(Role::parse(Role::Manager.as_str()), Some(Role::Manager));
        assert_eq!(Role::parse("supervisor"), None);
    }

    #[test]
    fn actor_role_checks() {
        let admin = Actor { id: 1, role: Some(Role::Admin) };
        let manager = Actor { id: 2, role: Some(Role::Manager) };
        let basic = Actor { id: 3, role: None };

        assert!(admin.is_admin());
        assert!(!manager.is_admin());
        assert!(manager.has_role());
        assert!(!basic.has_role());
    }
}
