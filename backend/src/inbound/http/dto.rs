//! Shared request/response DTOs for the HTTP adapter.
//!
//! Domain aggregates that already serialise safely (jobs, profiles,
//! applications) go over the wire as-is; the user entity gets an explicit
//! DTO so the password hash and internal state can never leak by accident.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Page, PrivilegeFlags, Role, User, UserId};

/// Page-number query parameter shared by the listing endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number; defaults to the first page.
    pub page: Option<u32>,
}

impl PageQuery {
    /// Resolve the query against the endpoint's page size.
    pub fn resolve(self, size: u32) -> Page {
        Page::new(self.page.unwrap_or(1), size)
    }
}

/// Public representation of a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable identifier.
    pub id: UserId,
    /// Identity key.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Current role.
    pub role: Role,
    /// Flags derived from the role.
    #[serde(flatten)]
    pub flags: PrivilegeFlags,
    /// Whether the account may authenticate.
    pub is_active: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            name: user.name().map(str::to_owned),
            role: user.role(),
            flags: user.flags(),
            is_active: user.is_active(),
        }
    }
}
