//! Port abstraction for job-posting persistence adapters.

use async_trait::async_trait;

use crate::domain::job::{Job, JobId};
use crate::domain::page::Page;
use crate::domain::profile::RecruiterId;
use crate::domain::search::{JobPosting, JobSearchCriteria};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by job repository adapters.
    pub enum JobPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "job repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "job repository query failed: {message}",
    }
}

/// Persistence port for job postings.
///
/// Read operations that feed public listings return [`JobPosting`] (the job
/// joined with its company name); recruiter-scoped reads return the bare
/// [`Job`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new posting.
    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError>;

    /// Persist changes to an existing posting.
    async fn update(&self, job: &Job) -> Result<(), JobPersistenceError>;

    /// Delete a posting, cascading to its applications.
    ///
    /// Returns whether a record was removed.
    async fn delete(&self, id: JobId) -> Result<bool, JobPersistenceError>;

    /// Fetch a posting with its company name.
    async fn find_by_id(&self, id: JobId) -> Result<Option<JobPosting>, JobPersistenceError>;

    /// List active postings, newest first.
    async fn list_active(&self, page: Page) -> Result<Vec<JobPosting>, JobPersistenceError>;

    /// List a recruiter's own postings, newest first.
    async fn list_by_recruiter(
        &self,
        recruiter_id: RecruiterId,
        page: Page,
    ) -> Result<Vec<Job>, JobPersistenceError>;

    /// Apply the search conjunction, newest first.
    async fn search(
        &self,
        criteria: &JobSearchCriteria,
        page: Page,
    ) -> Result<Vec<JobPosting>, JobPersistenceError>;
}
