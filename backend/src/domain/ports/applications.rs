//! Driving port for the application lifecycle use-cases.

use async_trait::async_trait;

use crate::domain::application::{
    Application, ApplicationDetail, ApplicationId, ApplicationStatus, ApplicationSummary,
};
use crate::domain::job::JobId;
use crate::domain::page::Page;
use crate::domain::user::UserId;
use crate::domain::Error;

/// Fields accepted when applying to a job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyRequest {
    /// Optional cover letter.
    pub cover_letter: Option<String>,
}

/// Domain use-case port for applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsService: Send + Sync {
    /// Submit an application for the actor's employee profile.
    ///
    /// Duplicate (employee, job) pairs are reported as a conflict; success
    /// schedules exactly one notification to the owning recruiter.
    async fn apply(
        &self,
        actor: UserId,
        job_id: JobId,
        request: ApplyRequest,
    ) -> Result<Application, Error>;

    /// List the actor's applications: own ones for employees, those against
    /// their postings for recruiters. Newest first.
    async fn list_applications(
        &self,
        actor: UserId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, Error>;

    /// Fetch an application with its parties; visible to the two parties
    /// only.
    async fn application_detail(
        &self,
        actor: UserId,
        id: ApplicationId,
    ) -> Result<ApplicationDetail, Error>;

    /// Move an application to a new status; owning recruiter only.
    ///
    /// Success records the actor for auditing and schedules exactly one
    /// notification to the employee.
    async fn transition_status(
        &self,
        actor: UserId,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, Error>;
}
