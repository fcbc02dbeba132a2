//! Job applications and their status lifecycle.
//!
//! An application joins one employee to one job and is unique per pair.
//! Status starts at `submitted`; `offered` and `rejected` are terminal. The
//! owning recruiter may move an application to any enumerated status (the
//! enumeration itself is the only guard: unknown values fail to parse).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::job::JobId;
use super::profile::EmployeeId;
use super::user::{EmailAddress, UserId};

/// Stable application identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ApplicationId(Uuid);

impl ApplicationId {
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

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Application review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Initial state on submission.
    Submitted,
    /// The recruiter is reviewing the application.
    UnderReview,
    /// The applicant has been invited to interview.
    Interview,
    /// Terminal: an offer was extended.
    Offered,
    /// Terminal: the application was declined.
    Rejected,
}

impl ApplicationStatus {
    /// Stable snake_case name used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Interview => "interview",
            Self::Offered => "offered",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition is specified beyond this status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Offered | Self::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status: {value}")]
pub struct ApplicationStatusParseError {
    /// The rejected input.
    pub value: String,
}

impl std::str::FromStr for ApplicationStatus {
    type Err = ApplicationStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "under_review" => Ok(Self::UnderReview),
            "interview" => Ok(Self::Interview),
            "offered" => Ok(Self::Offered),
            "rejected" => Ok(Self::Rejected),
            other => Err(ApplicationStatusParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Application of one employee to one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Stable identifier.
    pub id: ApplicationId,
    /// Applying employee profile.
    pub employee_id: EmployeeId,
    /// Target job.
    pub job_id: JobId,
    /// Optional cover letter.
    pub cover_letter: Option<String>,
    /// Set once on submission.
    pub submitted_at: DateTime<Utc>,
    /// Current review status.
    pub status: ApplicationStatus,
    /// User who performed the most recent status change, for auditing.
    pub status_changed_by: Option<UserId>,
    /// Soft-delete flag.
    pub is_active: bool,
}

impl Application {
    /// Create a freshly submitted application.
    pub fn submit(
        employee_id: EmployeeId,
        job_id: JobId,
        cover_letter: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ApplicationId::random(),
            employee_id,
            job_id,
            cover_letter,
            submitted_at: now,
            status: ApplicationStatus::Submitted,
            status_changed_by: None,
            is_active: true,
        }
    }

    /// Apply a status change, recording the acting user.
    pub fn update_status(&mut self, status: ApplicationStatus, changed_by: UserId) {
        self.status = status;
        self.status_changed_by = Some(changed_by);
    }
}

/// Resolved relationships around an application, loaded once so the policy
/// predicates and notification payloads stay pure over in-memory state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationParties {
    /// User owning the applying employee profile.
    pub employee_user_id: UserId,
    /// Employee's notification address.
    pub employee_email: EmailAddress,
    /// Employee's display name, when set.
    pub employee_name: Option<String>,
    /// User owning the recruiter profile behind the job.
    pub recruiter_user_id: UserId,
    /// Recruiter's notification address.
    pub recruiter_email: EmailAddress,
    /// The job applied to.
    pub job_id: JobId,
    /// Title of the job applied to.
    pub job_title: String,
}

/// Application together with its resolved parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDetail {
    /// The application record.
    pub application: Application,
    /// Resolved relationships.
    pub parties: ApplicationParties,
}

/// Application listed alongside the title of the job it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    /// The application record.
    pub application: Application,
    /// Title of the job applied to.
    pub job_title: String,
}
