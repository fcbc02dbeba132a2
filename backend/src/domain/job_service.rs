//! Job posting and discovery domain service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::account_service::{
    map_employee_persistence_error, map_recruiter_persistence_error, map_user_persistence_error,
};
use crate::domain::application_service::map_application_persistence_error;
use crate::domain::job::{Job, JobId, JobValidationError, Salary};
use crate::domain::page::Page;
use crate::domain::policy;
use crate::domain::ports::{
    ApplicationRepository, EmployeeRepository, JobDraft, JobListPage, JobPersistenceError,
    JobRepository, JobView, JobsService, RecruiterRepository, UserRepository,
};
use crate::domain::profile::RecruiterProfile;
use crate::domain::role::Role;
use crate::domain::search::{JobPosting, JobSearchCriteria};
use crate::domain::user::{User, UserId};
use crate::domain::Error;

/// Job service implementing the jobs driving port.
pub struct JobService<J, R, E, A, U> {
    jobs: Arc<J>,
    recruiters: Arc<R>,
    employees: Arc<E>,
    applications: Arc<A>,
    users: Arc<U>,
}

// Hand-written so cloning only touches the Arcs and puts no bounds on the
// adapter types.
impl<J, R, E, A, U> Clone for JobService<J, R, E, A, U> {
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            recruiters: Arc::clone(&self.recruiters),
            employees: Arc::clone(&self.employees),
            applications: Arc::clone(&self.applications),
            users: Arc::clone(&self.users),
        }
    }
}

impl<J, R, E, A, U> JobService<J, R, E, A, U> {
    /// Create a new service over the given adapters.
    pub fn new(
        jobs: Arc<J>,
        recruiters: Arc<R>,
        employees: Arc<E>,
        applications: Arc<A>,
        users: Arc<U>,
    ) -> Self {
        Self {
            jobs,
            recruiters,
            employees,
            applications,
            users,
        }
    }
}

pub(crate) fn map_job_persistence_error(error: JobPersistenceError) -> Error {
    match error {
        JobPersistenceError::Connection { message } => Error::service_unavailable(message),
        JobPersistenceError::Query { message } => Error::internal(message),
    }
}

fn map_job_validation_error(error: JobValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn parse_salary(raw: Option<i64>) -> Result<Option<Salary>, Error> {
    raw.map(Salary::new)
        .transpose()
        .map_err(map_job_validation_error)
}

impl<J, R, E, A, U> JobService<J, R, E, A, U>
where
    J: JobRepository,
    R: RecruiterRepository,
    E: EmployeeRepository,
    A: ApplicationRepository,
    U: UserRepository,
{
    async fn load_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn recruiter_profile_of(&self, user: &User) -> Result<RecruiterProfile, Error> {
        if user.role() != Role::Recruiter {
            return Err(Error::forbidden("only recruiters can manage jobs"));
        }
        self.recruiters
            .find_by_user(user.id())
            .await
            .map_err(map_recruiter_persistence_error)?
            .ok_or_else(|| Error::not_found("recruiter profile not found"))
    }

    /// Load the job and authorise the actor against it in one step.
    async fn load_for_manage(
        &self,
        actor: UserId,
        id: JobId,
    ) -> Result<(Job, RecruiterProfile), Error> {
        let user = self.load_user(actor).await?;
        let posting = self
            .jobs
            .find_by_id(id)
            .await
            .map_err(map_job_persistence_error)?
            .ok_or_else(|| Error::not_found("job not found"))?;
        let profile = self.recruiter_profile_of(&user).await?;

        if !policy::can_manage_job(&user, &profile, &posting.job) {
            return Err(Error::forbidden("you do not own this job posting"));
        }
        Ok((posting.job, profile))
    }

    async fn applied_job_ids_for(&self, actor: UserId) -> Result<Vec<JobId>, Error> {
        let Some(profile) = self
            .employees
            .find_by_user(actor)
            .await
            .map_err(map_employee_persistence_error)?
        else {
            return Ok(Vec::new());
        };
        self.applications
            .applied_job_ids(profile.id)
            .await
            .map_err(map_application_persistence_error)
    }
}

#[async_trait]
impl<J, R, E, A, U> JobsService for JobService<J, R, E, A, U>
where
    J: JobRepository,
    R: RecruiterRepository,
    E: EmployeeRepository,
    A: ApplicationRepository,
    U: UserRepository,
{
    async fn create_job(&self, actor: UserId, draft: JobDraft) -> Result<Job, Error> {
        let user = self.load_user(actor).await?;
        let profile = self.recruiter_profile_of(&user).await?;
        let salary = parse_salary(draft.salary)?;

        let job = Job::post(
            profile.id,
            draft.title,
            draft.description,
            draft.location,
            draft.job_type,
            salary,
            draft.application_deadline,
            Utc::now(),
        )
        .map_err(map_job_validation_error)?;

        self.jobs
            .insert(&job)
            .await
            .map_err(map_job_persistence_error)?;
        Ok(job)
    }

    async fn update_job(&self, actor: UserId, id: JobId, draft: JobDraft) -> Result<Job, Error> {
        let (mut job, _profile) = self.load_for_manage(actor, id).await?;
        let salary = parse_salary(draft.salary)?;
        if draft.title.trim().is_empty() {
            return Err(map_job_validation_error(JobValidationError::EmptyTitle));
        }

        job.title = draft.title;
        job.description = draft.description;
        job.location = draft.location;
        job.job_type = draft.job_type;
        job.salary = salary;
        job.application_deadline = draft.application_deadline;

        self.jobs
            .update(&job)
            .await
            .map_err(map_job_persistence_error)?;
        Ok(job)
    }

    async fn delete_job(&self, actor: UserId, id: JobId) -> Result<(), Error> {
        let (job, _profile) = self.load_for_manage(actor, id).await?;
        let removed = self
            .jobs
            .delete(job.id)
            .await
            .map_err(map_job_persistence_error)?;
        if !removed {
            return Err(Error::not_found("job not found"));
        }
        Ok(())
    }

    async fn job_detail(&self, actor: Option<UserId>, id: JobId) -> Result<JobView, Error> {
        let posting = self
            .jobs
            .find_by_id(id)
            .await
            .map_err(map_job_persistence_error)?
            .ok_or_else(|| Error::not_found("job not found"))?;

        let mut already_applied = false;
        if let Some(actor) = actor
            && let Some(profile) = self
                .employees
                .find_by_user(actor)
                .await
                .map_err(map_employee_persistence_error)?
        {
            already_applied = self
                .applications
                .exists_for_pair(profile.id, posting.job.id)
                .await
                .map_err(map_application_persistence_error)?;
        }

        Ok(JobView {
            posting,
            already_applied,
        })
    }

    async fn list_jobs(&self, actor: Option<UserId>, page: Page) -> Result<JobListPage, Error> {
        if let Some(actor_id) = actor {
            let user = self.load_user(actor_id).await?;
            if user.role() == Role::Recruiter {
                let profile = self.recruiter_profile_of(&user).await?;
                let jobs = self
                    .jobs
                    .list_by_recruiter(profile.id, page)
                    .await
                    .map_err(map_job_persistence_error)?;
                let postings = jobs
                    .into_iter()
                    .map(|job| JobPosting {
                        job,
                        company_name: profile.company_name.clone(),
                    })
                    .collect();
                return Ok(JobListPage {
                    postings,
                    applied_job_ids: Vec::new(),
                });
            }
        }

        let postings = self
            .jobs
            .list_active(page)
            .await
            .map_err(map_job_persistence_error)?;
        let applied_job_ids = match actor {
            Some(actor_id) => self.applied_job_ids_for(actor_id).await?,
            None => Vec::new(),
        };
        Ok(JobListPage {
            postings,
            applied_job_ids,
        })
    }

    async fn search_jobs(
        &self,
        criteria: JobSearchCriteria,
        page: Page,
    ) -> Result<Vec<JobPosting>, Error> {
        self.jobs
            .search(&criteria, page)
            .await
            .map_err(map_job_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::job::JobType;
    use crate::domain::ports::{
        MockApplicationRepository, MockEmployeeRepository, MockJobRepository,
        MockRecruiterRepository, MockUserRepository,
    };
    use crate::domain::user::EmailAddress;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    type Service = JobService<
        MockJobRepository,
        MockRecruiterRepository,
        MockEmployeeRepository,
        MockApplicationRepository,
        MockUserRepository,
    >;

    struct Fixture {
        jobs: MockJobRepository,
        recruiters: MockRecruiterRepository,
        employees: MockEmployeeRepository,
        applications: MockApplicationRepository,
        users: MockUserRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                jobs: MockJobRepository::new(),
                recruiters: MockRecruiterRepository::new(),
                employees: MockEmployeeRepository::new(),
                applications: MockApplicationRepository::new(),
                users: MockUserRepository::new(),
            }
        }

        fn with_user(mut self, user: User) -> Self {
            self.users
                .expect_find_by_id()
                .returning(move |_| Ok(Some(user.clone())));
            self
        }

        fn build(self) -> Service {
            JobService::new(
                Arc::new(self.jobs),
                Arc::new(self.recruiters),
                Arc::new(self.employees),
                Arc::new(self.applications),
                Arc::new(self.users),
            )
        }
    }

    fn user(role: Role) -> User {
        User::new(
            EmailAddress::new(format!("{role}@example.com")).expect("valid email"),
            None,
            role,
        )
    }

    fn draft() -> JobDraft {
        JobDraft {
            title: "Backend Developer".to_owned(),
            description: "Rust services".to_owned(),
            location: "Remote".to_owned(),
            job_type: JobType::FullTime,
            salary: Some(90_000),
            application_deadline: None,
        }
    }

    #[rstest]
    #[case(Role::Employee)]
    #[case(Role::Subadmin)]
    #[case(Role::Superadmin)]
    #[tokio::test]
    async fn non_recruiters_can_never_create_jobs(#[case] role: Role) {
        let actor = user(role);
        let actor_id = actor.id();
        let mut fixture = Fixture::new().with_user(actor);
        fixture.jobs.expect_insert().times(0);

        let err = fixture
            .build()
            .create_job(actor_id, draft())
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn recruiters_create_jobs_against_their_profile() {
        let actor = user(Role::Recruiter);
        let actor_id = actor.id();
        let profile = RecruiterProfile::empty(actor_id, Utc::now());
        let profile_id = profile.id;

        let mut fixture = Fixture::new().with_user(actor);
        fixture
            .recruiters
            .expect_find_by_user()
            .return_once(move |_| Ok(Some(profile)));
        fixture
            .jobs
            .expect_insert()
            .withf(move |job| job.recruiter_id == profile_id)
            .times(1)
            .return_once(|_| Ok(()));

        let job = fixture
            .build()
            .create_job(actor_id, draft())
            .await
            .expect("job created");
        assert_eq!(job.recruiter_id, profile_id);
        assert!(job.is_active);
    }

    #[tokio::test]
    async fn negative_salary_is_a_validation_failure() {
        let actor = user(Role::Recruiter);
        let actor_id = actor.id();
        let profile = RecruiterProfile::empty(actor_id, Utc::now());

        let mut fixture = Fixture::new().with_user(actor);
        fixture
            .recruiters
            .expect_find_by_user()
            .return_once(move |_| Ok(Some(profile)));
        fixture.jobs.expect_insert().times(0);

        let mut bad = draft();
        bad.salary = Some(-1);
        let err = fixture
            .build()
            .create_job(actor_id, bad)
            .await
            .expect_err("negative salary");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn a_recruiter_cannot_update_a_foreign_job() {
        let actor = user(Role::Recruiter);
        let actor_id = actor.id();
        let own_profile = RecruiterProfile::empty(actor_id, Utc::now());
        let foreign_job = Job::post(
            crate::domain::profile::RecruiterId::random(),
            "Backend Developer".to_owned(),
            String::new(),
            "Remote".to_owned(),
            JobType::FullTime,
            None,
            None,
            Utc::now(),
        )
        .expect("valid job");
        let job_id = foreign_job.id;

        let mut fixture = Fixture::new().with_user(actor);
        fixture.jobs.expect_find_by_id().return_once(move |_| {
            Ok(Some(JobPosting {
                job: foreign_job,
                company_name: "Globex".to_owned(),
            }))
        });
        fixture
            .recruiters
            .expect_find_by_user()
            .return_once(move |_| Ok(Some(own_profile)));
        fixture.jobs.expect_update().times(0);

        let err = fixture
            .build()
            .update_job(actor_id, job_id, draft())
            .await
            .expect_err("foreign job");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn anonymous_listing_shows_active_jobs_without_applied_ids() {
        let mut fixture = Fixture::new();
        fixture
            .jobs
            .expect_list_active()
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let pageful = fixture
            .build()
            .list_jobs(None, Page::first(10))
            .await
            .expect("listing succeeds");
        assert!(pageful.postings.is_empty());
        assert!(pageful.applied_job_ids.is_empty());
    }
}
