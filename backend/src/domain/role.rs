//! Account roles and the privilege flags derived from them.
//!
//! The staff/superuser flags are never stored independently of the role:
//! [`PrivilegeFlags::for_role`] is the single source of truth and is applied
//! on every construction and persist of a user, so the flags cannot drift
//! when a role changes.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Job seeker; owns an employee profile and submits applications.
    Employee,
    /// Posts jobs and reviews applications for them.
    Recruiter,
    /// Staff member without superuser rights.
    Subadmin,
    /// Full administrative access, including the admin views.
    Superadmin,
}

impl Role {
    /// All enumerated roles, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Employee,
        Self::Recruiter,
        Self::Subadmin,
        Self::Superadmin,
    ];

    /// Stable snake_case name used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Recruiter => "recruiter",
            Self::Subadmin => "subadmin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {value}")]
pub struct RoleParseError {
    /// The rejected input.
    pub value: String,
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Self::Employee),
            "recruiter" => Ok(Self::Recruiter),
            "subadmin" => Ok(Self::Subadmin),
            "superadmin" => Ok(Self::Superadmin),
            other => Err(RoleParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Elevated-privilege flags derived from a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivilegeFlags {
    /// Grants access to staff tooling.
    pub is_staff: bool,
    /// Grants unrestricted administrative access.
    pub is_superuser: bool,
}

impl PrivilegeFlags {
    /// Derive the flag pair for a role.
    ///
    /// `superadmin` carries both flags, `subadmin` only the staff flag, and
    /// every other role neither.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Superadmin => Self {
                is_staff: true,
                is_superuser: true,
            },
            Role::Subadmin => Self {
                is_staff: true,
                is_superuser: false,
            },
            Role::Employee | Role::Recruiter => Self {
                is_staff: false,
                is_superuser: false,
            },
        }
    }
}
