//! PostgreSQL-backed `JobRepository` implementation using Diesel ORM.
//!
//! Search composes the criteria conjunction onto a boxed query so only the
//! criteria that are present contribute SQL predicates, mirroring the pure
//! predicate in the domain.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::job::{Job, JobId, JobType, Salary};
use crate::domain::page::Page;
use crate::domain::ports::{JobPersistenceError, JobRepository};
use crate::domain::profile::RecruiterId;
use crate::domain::search::{JobPosting, JobSearchCriteria};

use super::diesel_error::{DbFailure, classify};
use super::models::{JobRow, JobUpdate, NewJobRow};
use super::pool::{DbPool, PoolError};
use super::schema::{jobs, recruiters};

/// Diesel-backed implementation of the `JobRepository` port.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> JobPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            JobPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> JobPersistenceError {
    match classify(error) {
        DbFailure::Connection(message) => JobPersistenceError::connection(message),
        DbFailure::Unique(constraint) => {
            JobPersistenceError::query(format!("unique constraint violated: {constraint}"))
        }
        DbFailure::Query(message) => JobPersistenceError::query(message),
    }
}

fn row_to_job(row: JobRow) -> Result<Job, JobPersistenceError> {
    let job_type: JobType = row
        .job_type
        .parse()
        .map_err(|err| JobPersistenceError::query(format!("corrupt job_type column: {err}")))?;
    let salary = row
        .salary
        .map(Salary::new)
        .transpose()
        .map_err(|err| JobPersistenceError::query(format!("corrupt salary column: {err}")))?;
    Ok(Job {
        id: JobId::from_uuid(row.id),
        recruiter_id: RecruiterId::from_uuid(row.recruiter_id),
        title: row.title,
        description: row.description,
        location: row.location,
        job_type,
        salary,
        posted_at: row.posted_at,
        application_deadline: row.application_deadline,
        is_active: row.is_active,
    })
}

fn row_to_posting(
    (row, company_name): (JobRow, String),
) -> Result<JobPosting, JobPersistenceError> {
    Ok(JobPosting {
        job: row_to_job(row)?,
        company_name,
    })
}

/// Escape LIKE wildcards in user input so substrings match literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewJobRow {
            id: *job.id.as_uuid(),
            recruiter_id: *job.recruiter_id.as_uuid(),
            title: &job.title,
            description: &job.description,
            location: &job.location,
            job_type: job.job_type.as_str(),
            salary: job.salary.map(|s| s.amount()),
            posted_at: job.posted_at,
            application_deadline: job.application_deadline,
            is_active: job.is_active,
        };

        diesel::insert_into(jobs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, job: &Job) -> Result<(), JobPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = JobUpdate {
            title: &job.title,
            description: &job.description,
            location: &job.location,
            job_type: job.job_type.as_str(),
            salary: Some(job.salary.map(|s| s.amount())),
            application_deadline: Some(job.application_deadline),
            is_active: job.is_active,
        };

        diesel::update(jobs::table.find(job.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: JobId) -> Result<bool, JobPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(jobs::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<JobPosting>, JobPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(JobRow, String)> = jobs::table
            .inner_join(recruiters::table)
            .filter(jobs::id.eq(id.as_uuid()))
            .select((JobRow::as_select(), recruiters::company_name))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_posting).transpose()
    }

    async fn list_active(&self, page: Page) -> Result<Vec<JobPosting>, JobPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(JobRow, String)> = jobs::table
            .inner_join(recruiters::table)
            .filter(jobs::is_active.eq(true))
            .order(jobs::posted_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .select((JobRow::as_select(), recruiters::company_name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_posting).collect()
    }

    async fn list_by_recruiter(
        &self,
        recruiter_id: RecruiterId,
        page: Page,
    ) -> Result<Vec<Job>, JobPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JobRow> = jobs::table
            .filter(jobs::recruiter_id.eq(recruiter_id.as_uuid()))
            .order(jobs::posted_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_job).collect()
    }

    async fn search(
        &self,
        criteria: &JobSearchCriteria,
        page: Page,
    ) -> Result<Vec<JobPosting>, JobPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = jobs::table
            .inner_join(recruiters::table)
            .filter(jobs::is_active.eq(true))
            .into_boxed();

        if let Some(company_name) = &criteria.company_name {
            query = query.filter(recruiters::company_name.ilike(like_pattern(company_name)));
        }
        if let Some(title) = &criteria.title {
            query = query.filter(jobs::title.ilike(like_pattern(title)));
        }
        if let Some(job_type) = criteria.job_type {
            query = query.filter(jobs::job_type.eq(job_type.as_str()));
        }
        if let Some(location) = &criteria.location {
            query = query.filter(jobs::location.ilike(like_pattern(location)));
        }
        if let Some(min_salary) = criteria.min_salary {
            query = query.filter(jobs::salary.ge(min_salary));
        }
        if let Some(posted_after) = criteria.posted_after {
            query = query.filter(jobs::posted_at.ge(posted_after));
        }
        if let Some(deadline_before) = criteria.deadline_before {
            query = query.filter(jobs::application_deadline.le(deadline_before));
        }

        let rows: Vec<(JobRow, String)> = query
            .order(jobs::posted_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .select((JobRow::as_select(), recruiters::company_name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_posting).collect()
    }
}
