//! Port abstraction for application persistence adapters.

use async_trait::async_trait;

use crate::domain::application::{
    Application, ApplicationDetail, ApplicationId, ApplicationStatus, ApplicationSummary,
};
use crate::domain::job::JobId;
use crate::domain::page::Page;
use crate::domain::profile::{EmployeeId, RecruiterId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by application repository adapters.
    pub enum ApplicationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "application repository query failed: {message}",
        /// The unique (employee, job) constraint rejected an insert.
        DuplicateApplication { message: String } => "application already exists: {message}",
    }
}

/// Persistence port for applications.
///
/// Inserts are guarded by a storage-level uniqueness constraint over
/// `(employee_id, job_id)`; adapters surface a violation as
/// [`ApplicationPersistenceError::DuplicateApplication`] so the pre-insert
/// existence check cannot race a concurrent double submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert a new application.
    async fn insert(&self, application: &Application) -> Result<(), ApplicationPersistenceError>;

    /// Whether an application already exists for the pair.
    async fn exists_for_pair(
        &self,
        employee_id: EmployeeId,
        job_id: JobId,
    ) -> Result<bool, ApplicationPersistenceError>;

    /// Fetch an application with its resolved parties.
    async fn find_detail(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationDetail>, ApplicationPersistenceError>;

    /// Persist a status change together with the acting user.
    async fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        changed_by: UserId,
    ) -> Result<(), ApplicationPersistenceError>;

    /// List an employee's applications, newest first.
    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError>;

    /// List the applications targeting a recruiter's postings, newest first.
    async fn list_for_recruiter(
        &self,
        recruiter_id: RecruiterId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError>;

    /// Ids of the jobs an employee has already applied to.
    async fn applied_job_ids(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<JobId>, ApplicationPersistenceError>;
}
