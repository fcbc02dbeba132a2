//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! The unique index over `(employee_id, job_id)` surfaces as the
//! `DuplicateApplication` port variant, which is what closes the
//! check-then-insert race on concurrent double submissions.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::application::{
    Application, ApplicationDetail, ApplicationId, ApplicationParties, ApplicationStatus,
    ApplicationSummary,
};
use crate::domain::job::JobId;
use crate::domain::page::Page;
use crate::domain::ports::{ApplicationPersistenceError, ApplicationRepository};
use crate::domain::profile::{EmployeeId, RecruiterId};
use crate::domain::user::{EmailAddress, UserId};

use super::diesel_error::{DbFailure, classify};
use super::models::{ApplicationRow, NewApplicationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{applications, employees, jobs, recruiters, users};

/// Diesel-backed implementation of the `ApplicationRepository` port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ApplicationPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationPersistenceError {
    match classify(error) {
        DbFailure::Connection(message) => ApplicationPersistenceError::connection(message),
        DbFailure::Unique(constraint) => {
            ApplicationPersistenceError::duplicate_application(constraint)
        }
        DbFailure::Query(message) => ApplicationPersistenceError::query(message),
    }
}

fn row_to_application(row: ApplicationRow) -> Result<Application, ApplicationPersistenceError> {
    let status: ApplicationStatus = row.status.parse().map_err(|err| {
        ApplicationPersistenceError::query(format!("corrupt status column: {err}"))
    })?;
    Ok(Application {
        id: ApplicationId::from_uuid(row.id),
        employee_id: EmployeeId::from_uuid(row.employee_id),
        job_id: JobId::from_uuid(row.job_id),
        cover_letter: row.cover_letter,
        submitted_at: row.submitted_at,
        status,
        status_changed_by: row.status_changed_by.map(UserId::from_uuid),
        is_active: row.is_active,
    })
}

fn parse_email(raw: &str) -> Result<EmailAddress, ApplicationPersistenceError> {
    EmailAddress::new(raw)
        .map_err(|err| ApplicationPersistenceError::query(format!("corrupt email column: {err}")))
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewApplicationRow {
            id: *application.id.as_uuid(),
            employee_id: *application.employee_id.as_uuid(),
            job_id: *application.job_id.as_uuid(),
            cover_letter: application.cover_letter.as_deref(),
            submitted_at: application.submitted_at,
            status: application.status.as_str(),
            status_changed_by: application.status_changed_by.map(|id| *id.as_uuid()),
            is_active: application.is_active,
        };

        diesel::insert_into(applications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn exists_for_pair(
        &self,
        employee_id: EmployeeId,
        job_id: JobId,
    ) -> Result<bool, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<Uuid> = applications::table
            .filter(applications::employee_id.eq(employee_id.as_uuid()))
            .filter(applications::job_id.eq(job_id.as_uuid()))
            .select(applications::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }

    async fn find_detail(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationDetail>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(row) = applications::table
            .find(id.as_uuid())
            .select(ApplicationRow::as_select())
            .first::<ApplicationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        // The users table appears on both sides of the join graph, so the
        // parties are resolved with follow-up lookups instead of aliases.
        let employee_user: Uuid = employees::table
            .find(row.employee_id)
            .select(employees::user_id)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (employee_email, employee_name): (String, Option<String>) = users::table
            .find(employee_user)
            .select((users::email, users::name))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let (job_title, recruiter_id): (String, Uuid) = jobs::table
            .find(row.job_id)
            .select((jobs::title, jobs::recruiter_id))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let recruiter_user: Uuid = recruiters::table
            .find(recruiter_id)
            .select(recruiters::user_id)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let recruiter_email: String = users::table
            .find(recruiter_user)
            .select(users::email)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let parties = ApplicationParties {
            employee_user_id: UserId::from_uuid(employee_user),
            employee_email: parse_email(&employee_email)?,
            employee_name,
            recruiter_user_id: UserId::from_uuid(recruiter_user),
            recruiter_email: parse_email(&recruiter_email)?,
            job_id: JobId::from_uuid(row.job_id),
            job_title,
        };

        Ok(Some(ApplicationDetail {
            application: row_to_application(row)?,
            parties,
        }))
    }

    async fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        changed_by: UserId,
    ) -> Result<(), ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(applications::table.find(id.as_uuid()))
            .set((
                applications::status.eq(status.as_str()),
                applications::status_changed_by.eq(Some(*changed_by.as_uuid())),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ApplicationRow, String)> = applications::table
            .inner_join(jobs::table)
            .filter(applications::employee_id.eq(employee_id.as_uuid()))
            .order(applications::submitted_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .select((ApplicationRow::as_select(), jobs::title))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, job_title)| {
                Ok(ApplicationSummary {
                    application: row_to_application(row)?,
                    job_title,
                })
            })
            .collect()
    }

    async fn list_for_recruiter(
        &self,
        recruiter_id: RecruiterId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ApplicationRow, String)> = applications::table
            .inner_join(jobs::table)
            .filter(jobs::recruiter_id.eq(recruiter_id.as_uuid()))
            .order(applications::submitted_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .select((ApplicationRow::as_select(), jobs::title))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, job_title)| {
                Ok(ApplicationSummary {
                    application: row_to_application(row)?,
                    job_title,
                })
            })
            .collect()
    }

    async fn applied_job_ids(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<JobId>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = applications::table
            .filter(applications::employee_id.eq(employee_id.as_uuid()))
            .select(applications::job_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(JobId::from_uuid).collect())
    }
}
