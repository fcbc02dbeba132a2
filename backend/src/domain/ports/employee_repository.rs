//! Port abstraction for employee-profile persistence adapters.

use async_trait::async_trait;

use crate::domain::page::Page;
use crate::domain::profile::{EmployeeId, EmployeeProfile};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by employee repository adapters.
    pub enum EmployeePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "employee repository query failed: {message}",
    }
}

/// Persistence port for employee profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert or update a profile (one per user).
    async fn upsert(&self, profile: &EmployeeProfile) -> Result<(), EmployeePersistenceError>;

    /// Fetch the profile owned by a user.
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<EmployeeProfile>, EmployeePersistenceError>;

    /// Fetch a profile by identifier.
    async fn find_by_id(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeProfile>, EmployeePersistenceError>;

    /// List profiles ordered by owning user.
    async fn list(&self, page: Page) -> Result<Vec<EmployeeProfile>, EmployeePersistenceError>;
}
