//! Role-specific profiles extending a user account.
//!
//! A profile is owned by exactly one user: employees carry contact details
//! and a resume reference, recruiters carry the company identity shown on
//! their postings. Profiles are created lazily on first update, so all
//! detail fields tolerate being empty.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Stable employee-profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable recruiter-profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RecruiterId(Uuid);

impl RecruiterId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecruiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Profile owned by a user with the employee role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    /// Stable profile identifier.
    pub id: EmployeeId,
    /// Owning user.
    pub user_id: UserId,
    /// Reference to an uploaded resume artifact, when present.
    pub resume: Option<String>,
    /// Contact phone number; empty until the first profile update.
    pub phone_number: String,
    /// Free-form location; empty until the first profile update.
    pub location: String,
}

impl EmployeeProfile {
    /// Create the empty profile attached to a user at signup or on first
    /// profile access.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            id: EmployeeId::random(),
            user_id,
            resume: None,
            phone_number: String::new(),
            location: String::new(),
        }
    }
}

/// Profile owned by a user with the recruiter role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfile {
    /// Stable profile identifier.
    pub id: RecruiterId,
    /// Owning user.
    pub user_id: UserId,
    /// Company name shown on postings; empty until the first update.
    pub company_name: String,
    /// Company website, when provided.
    pub website: Option<String>,
    /// Reference to an uploaded logo artifact, when present.
    pub logo: Option<String>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RecruiterProfile {
    /// Create the empty profile attached to a user at signup or on first
    /// profile access.
    pub fn empty(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: RecruiterId::random(),
            user_id,
            company_name: String::new(),
            website: None,
            logo: None,
            created_at: now,
            updated_at: now,
        }
    }
}
