//! Driving port for profile reads and updates.

use async_trait::async_trait;

use crate::domain::profile::{EmployeeProfile, RecruiterProfile};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Employee profile fields accepted from the profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeProfileUpdate {
    /// Reference to an uploaded resume artifact.
    pub resume: Option<String>,
    /// Contact phone number.
    pub phone_number: String,
    /// Free-form location.
    pub location: String,
}

/// Recruiter profile fields accepted from the profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecruiterProfileUpdate {
    /// Company name shown on postings.
    pub company_name: String,
    /// Company website.
    pub website: Option<String>,
    /// Reference to an uploaded logo artifact.
    pub logo: Option<String>,
}

/// Domain use-case port for profile management.
///
/// Profiles are created lazily: the read operations materialise an empty
/// profile on first access, mirroring the update operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfilesService: Send + Sync {
    /// Fetch (or lazily create) the actor's employee profile.
    ///
    /// Denied unless the actor's role is employee.
    async fn employee_profile(&self, actor: UserId) -> Result<EmployeeProfile, Error>;

    /// Update the actor's employee profile.
    async fn update_employee_profile(
        &self,
        actor: UserId,
        update: EmployeeProfileUpdate,
    ) -> Result<EmployeeProfile, Error>;

    /// Fetch (or lazily create) the actor's recruiter profile.
    ///
    /// Denied unless the actor's role is recruiter.
    async fn recruiter_profile(&self, actor: UserId) -> Result<RecruiterProfile, Error>;

    /// Update the actor's recruiter profile.
    async fn update_recruiter_profile(
        &self,
        actor: UserId,
        update: RecruiterProfileUpdate,
    ) -> Result<RecruiterProfile, Error>;
}
