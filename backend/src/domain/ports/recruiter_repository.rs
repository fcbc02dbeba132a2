//! Port abstraction for recruiter-profile persistence adapters.

use async_trait::async_trait;

use crate::domain::page::Page;
use crate::domain::profile::{RecruiterId, RecruiterProfile};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recruiter repository adapters.
    pub enum RecruiterPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "recruiter repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recruiter repository query failed: {message}",
    }
}

/// Persistence port for recruiter profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecruiterRepository: Send + Sync {
    /// Insert or update a profile (one per user).
    async fn upsert(&self, profile: &RecruiterProfile) -> Result<(), RecruiterPersistenceError>;

    /// Fetch the profile owned by a user.
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<RecruiterProfile>, RecruiterPersistenceError>;

    /// Fetch a profile by identifier.
    async fn find_by_id(
        &self,
        id: RecruiterId,
    ) -> Result<Option<RecruiterProfile>, RecruiterPersistenceError>;

    /// List profiles ordered by creation time, newest first.
    async fn list(&self, page: Page) -> Result<Vec<RecruiterProfile>, RecruiterPersistenceError>;
}
