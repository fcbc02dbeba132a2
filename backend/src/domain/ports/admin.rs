//! Driving port for the administrative directory.
//!
//! Every operation here authorises through the superadmin-only policy check
//! before touching state; handlers never duplicate that gate.

use async_trait::async_trait;

use crate::domain::page::Page;
use crate::domain::profile::{EmployeeId, EmployeeProfile, RecruiterId, RecruiterProfile};
use crate::domain::role::Role;
use crate::domain::user::{EmailAddress, User, UserId};
use crate::domain::Error;

/// Payload for administrative account provisioning.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionUserRequest {
    /// Identity key for the new account.
    pub email: EmailAddress,
    /// Optional display name.
    pub name: Option<String>,
    /// Initial plaintext password.
    pub password: String,
    /// Role to provision with; any enumerated role is allowed here.
    pub role: Role,
}

/// Mutable account fields exposed to administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAccountUpdate {
    /// New role; privilege flags are re-derived from it on save.
    pub role: Role,
    /// Whether the account may authenticate.
    pub is_active: bool,
}

/// Domain use-case port for the admin views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// List accounts ordered by email.
    async fn list_users(&self, actor: UserId, page: Page) -> Result<Vec<User>, Error>;

    /// Provision an account with any role.
    async fn provision_user(
        &self,
        actor: UserId,
        request: ProvisionUserRequest,
    ) -> Result<User, Error>;

    /// Update an account's role and active flag.
    async fn update_user(
        &self,
        actor: UserId,
        id: UserId,
        update: UserAccountUpdate,
    ) -> Result<User, Error>;

    /// Delete an account, cascading to profiles and applications.
    async fn delete_user(&self, actor: UserId, id: UserId) -> Result<(), Error>;

    /// List employee profiles.
    async fn list_employees(
        &self,
        actor: UserId,
        page: Page,
    ) -> Result<Vec<EmployeeProfile>, Error>;

    /// List recruiter profiles.
    async fn list_recruiters(
        &self,
        actor: UserId,
        page: Page,
    ) -> Result<Vec<RecruiterProfile>, Error>;

    /// Fetch one employee profile.
    async fn employee_detail(
        &self,
        actor: UserId,
        id: EmployeeId,
    ) -> Result<EmployeeProfile, Error>;

    /// Fetch one recruiter profile.
    async fn recruiter_detail(
        &self,
        actor: UserId,
        id: RecruiterId,
    ) -> Result<RecruiterProfile, Error>;
}
