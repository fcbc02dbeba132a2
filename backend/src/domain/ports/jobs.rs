//! Driving port for job posting and discovery use-cases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::job::{Job, JobId, JobType};
use crate::domain::page::Page;
use crate::domain::search::{JobPosting, JobSearchCriteria};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Fields accepted when creating or replacing a posting.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    /// Position title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Free-form location.
    pub location: String,
    /// Employment arrangement.
    pub job_type: JobType,
    /// Advertised salary; validated as non-negative.
    pub salary: Option<i64>,
    /// Optional application deadline.
    pub application_deadline: Option<DateTime<Utc>>,
}

/// One page of the public job listing.
#[derive(Debug, Clone, PartialEq)]
pub struct JobListPage {
    /// Postings on this page.
    pub postings: Vec<JobPosting>,
    /// Jobs the requesting employee already applied to; empty otherwise.
    pub applied_job_ids: Vec<JobId>,
}

/// A posting plus whether the requesting employee already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    /// The posting with its company name.
    pub posting: JobPosting,
    /// True only for employees with an existing application.
    pub already_applied: bool,
}

/// Domain use-case port for jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobsService: Send + Sync {
    /// Create a posting owned by the actor's recruiter profile.
    async fn create_job(&self, actor: UserId, draft: JobDraft) -> Result<Job, Error>;

    /// Replace a posting's fields; owning recruiter only.
    async fn update_job(&self, actor: UserId, id: JobId, draft: JobDraft) -> Result<Job, Error>;

    /// Delete a posting; owning recruiter only.
    async fn delete_job(&self, actor: UserId, id: JobId) -> Result<(), Error>;

    /// Fetch a posting, flagging whether the actor already applied.
    async fn job_detail(&self, actor: Option<UserId>, id: JobId) -> Result<JobView, Error>;

    /// List postings: recruiters see their own, everyone else active ones.
    async fn list_jobs(&self, actor: Option<UserId>, page: Page) -> Result<JobListPage, Error>;

    /// Apply the search conjunction over active postings.
    async fn search_jobs(
        &self,
        criteria: JobSearchCriteria,
        page: Page,
    ) -> Result<Vec<JobPosting>, Error>;
}
