//! Caller identity and role model.
//!
//! Sign-in, sign-up, and session handling live with an external
//! collaborator; this module only describes what that collaborator hands
//! back. Workflow operations never consult ambient state for the caller:
//! every service method takes an [`AuthContext`] and checks its own role
//! preconditions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Roles recognized by the school administration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier issued by the external authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Resolved caller identity, passed explicitly into every workflow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AccessDenied> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AccessDenied {
                required: Role::Admin,
                held: self.role,
            })
        }
    }
}

/// Raised when a caller's role does not satisfy an operation's precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation requires the {required} role, caller holds {held}")]
pub struct AccessDenied {
    pub required: Role,
    pub held: Role,
}

/// External collaborator mapping a user id to a signed-in identity and role.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, user_id: &UserId) -> Result<Option<AuthContext>, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            user_id: UserId("u-1".to_string()),
            email: "u-1@example.edu".to_string(),
            role,
        }
    }

    #[test]
    fn admin_passes_role_check() {
        assert!(ctx(Role::Admin).require_admin().is_ok());
    }

    #[test]
    fn student_fails_role_check_with_held_role() {
        let denied = ctx(Role::Student).require_admin().unwrap_err();
        assert_eq!(denied.held, Role::Student);
        assert!(denied.to_string().contains("admin"));
    }
}
