//! In-memory adapters for integration tests.
//!
//! One backing store implements every repository port so integration tests
//! can exercise the domain services end-to-end without PostgreSQL. The
//! store honours the same uniqueness rules the migrations enforce (unique
//! email, unique `(employee_id, job_id)` pair) so conflict paths behave
//! like the real adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    ApplicationPersistenceError, ApplicationRepository, EmployeePersistenceError,
    EmployeeRepository, FixturePasswordHasher, JobPersistenceError, JobRepository,
    RecordingNotificationQueue, RecruiterPersistenceError, RecruiterRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccountService, AdminService, Application, ApplicationDetail, ApplicationId,
    ApplicationParties, ApplicationService, ApplicationStatus, ApplicationSummary, EmailAddress,
    EmployeeId, EmployeeProfile, Job, JobId, JobPosting, JobSearchCriteria, JobService, Page,
    RecruiterId, RecruiterProfile, User, UserId,
};

#[derive(Default)]
struct StoreState {
    users: HashMap<Uuid, (User, String)>,
    employees: HashMap<Uuid, EmployeeProfile>,
    recruiters: HashMap<Uuid, RecruiterProfile>,
    jobs: HashMap<Uuid, Job>,
    applications: HashMap<Uuid, Application>,
}

/// Shared in-memory store implementing every repository port.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<StoreState>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    /// Number of stored applications for a pair, for test assertions.
    ///
    /// # Panics
    /// Panics if a previous holder of the internal lock panicked.
    pub fn applications_for_pair(&self, employee_id: EmployeeId, job_id: JobId) -> usize {
        self.state
            .lock()
            .expect("in-memory store lock")
            .applications
            .values()
            .filter(|a| a.employee_id == employee_id && a.job_id == job_id)
            .count()
    }

    /// Fetch a stored application, for test assertions.
    ///
    /// # Panics
    /// Panics if a previous holder of the internal lock panicked.
    pub fn application(&self, id: ApplicationId) -> Option<Application> {
        self.state
            .lock()
            .expect("in-memory store lock")
            .applications
            .get(id.as_uuid())
            .cloned()
    }

    /// Fetch a stored job, for test assertions.
    ///
    /// # Panics
    /// Panics if a previous holder of the internal lock panicked.
    pub fn job(&self, id: JobId) -> Option<Job> {
        self.state
            .lock()
            .expect("in-memory store lock")
            .jobs
            .get(id.as_uuid())
            .cloned()
    }
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(0);
    let limit = usize::try_from(page.limit()).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl UserRepository for InMemoryBackend {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        if state
            .users
            .values()
            .any(|(existing, _)| existing.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(
            *user.id().as_uuid(),
            (user.clone(), password_hash.to_owned()),
        );
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        match state.users.get_mut(user.id().as_uuid()) {
            Some(slot) => {
                slot.0 = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found")),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        if state.users.remove(id.as_uuid()).is_none() {
            return Ok(false);
        }

        // Cascade exactly as the foreign keys do.
        let employee_ids: Vec<Uuid> = state
            .employees
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| *p.id.as_uuid())
            .collect();
        let recruiter_ids: Vec<Uuid> = state
            .recruiters
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| *p.id.as_uuid())
            .collect();
        state.employees.retain(|_, p| p.user_id != id);
        state.recruiters.retain(|_, p| p.user_id != id);
        let job_ids: Vec<Uuid> = state
            .jobs
            .values()
            .filter(|j| recruiter_ids.contains(j.recruiter_id.as_uuid()))
            .map(|j| *j.id.as_uuid())
            .collect();
        state
            .jobs
            .retain(|_, j| !recruiter_ids.contains(j.recruiter_id.as_uuid()));
        state.applications.retain(|_, a| {
            !employee_ids.contains(a.employee_id.as_uuid())
                && !job_ids.contains(a.job_id.as_uuid())
        });
        Ok(true)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state.users.get(id.as_uuid()).map(|(user, _)| user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state
            .users
            .values()
            .find(|(user, _)| user.email() == email)
            .map(|(user, _)| user.clone()))
    }

    async fn credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<(User, String)>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state
            .users
            .values()
            .find(|(user, _)| user.email() == email)
            .cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        let mut users: Vec<User> = state.users.values().map(|(user, _)| user.clone()).collect();
        users.sort_by(|a, b| a.email().as_ref().cmp(b.email().as_ref()));
        Ok(paginate(users, page))
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryBackend {
    async fn upsert(&self, profile: &EmployeeProfile) -> Result<(), EmployeePersistenceError> {
        let mut state = self.lock().map_err(EmployeePersistenceError::connection)?;
        // One profile per user: replace any existing row for the owner.
        state.employees.retain(|_, p| p.user_id != profile.user_id);
        state
            .employees
            .insert(*profile.id.as_uuid(), profile.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<EmployeeProfile>, EmployeePersistenceError> {
        let state = self.lock().map_err(EmployeePersistenceError::connection)?;
        Ok(state
            .employees
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeProfile>, EmployeePersistenceError> {
        let state = self.lock().map_err(EmployeePersistenceError::connection)?;
        Ok(state.employees.get(id.as_uuid()).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<EmployeeProfile>, EmployeePersistenceError> {
        let state = self.lock().map_err(EmployeePersistenceError::connection)?;
        let mut profiles: Vec<EmployeeProfile> = state.employees.values().cloned().collect();
        profiles.sort_by_key(|p| *p.user_id.as_uuid());
        Ok(paginate(profiles, page))
    }
}

#[async_trait]
impl RecruiterRepository for InMemoryBackend {
    async fn upsert(&self, profile: &RecruiterProfile) -> Result<(), RecruiterPersistenceError> {
        let mut state = self.lock().map_err(RecruiterPersistenceError::connection)?;
        state.recruiters.retain(|_, p| p.user_id != profile.user_id);
        state
            .recruiters
            .insert(*profile.id.as_uuid(), profile.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<RecruiterProfile>, RecruiterPersistenceError> {
        let state = self.lock().map_err(RecruiterPersistenceError::connection)?;
        Ok(state
            .recruiters
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: RecruiterId,
    ) -> Result<Option<RecruiterProfile>, RecruiterPersistenceError> {
        let state = self.lock().map_err(RecruiterPersistenceError::connection)?;
        Ok(state.recruiters.get(id.as_uuid()).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<RecruiterProfile>, RecruiterPersistenceError> {
        let state = self.lock().map_err(RecruiterPersistenceError::connection)?;
        let mut profiles: Vec<RecruiterProfile> = state.recruiters.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(profiles, page))
    }
}

impl InMemoryBackend {
    fn posting_for(state: &StoreState, job: &Job) -> JobPosting {
        let company_name = state
            .recruiters
            .get(job.recruiter_id.as_uuid())
            .map(|p| p.company_name.clone())
            .unwrap_or_default();
        JobPosting {
            job: job.clone(),
            company_name,
        }
    }
}

#[async_trait]
impl JobRepository for InMemoryBackend {
    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError> {
        let mut state = self.lock().map_err(JobPersistenceError::connection)?;
        state.jobs.insert(*job.id.as_uuid(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &Job) -> Result<(), JobPersistenceError> {
        let mut state = self.lock().map_err(JobPersistenceError::connection)?;
        match state.jobs.get_mut(job.id.as_uuid()) {
            Some(slot) => {
                *slot = job.clone();
                Ok(())
            }
            None => Err(JobPersistenceError::query("job not found")),
        }
    }

    async fn delete(&self, id: JobId) -> Result<bool, JobPersistenceError> {
        let mut state = self.lock().map_err(JobPersistenceError::connection)?;
        let removed = state.jobs.remove(id.as_uuid()).is_some();
        if removed {
            state.applications.retain(|_, a| a.job_id != id);
        }
        Ok(removed)
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<JobPosting>, JobPersistenceError> {
        let state = self.lock().map_err(JobPersistenceError::connection)?;
        Ok(state
            .jobs
            .get(id.as_uuid())
            .map(|job| Self::posting_for(&state, job)))
    }

    async fn list_active(&self, page: Page) -> Result<Vec<JobPosting>, JobPersistenceError> {
        let state = self.lock().map_err(JobPersistenceError::connection)?;
        let mut postings: Vec<JobPosting> = state
            .jobs
            .values()
            .filter(|job| job.is_active)
            .map(|job| Self::posting_for(&state, job))
            .collect();
        postings.sort_by(|a, b| b.job.posted_at.cmp(&a.job.posted_at));
        Ok(paginate(postings, page))
    }

    async fn list_by_recruiter(
        &self,
        recruiter_id: RecruiterId,
        page: Page,
    ) -> Result<Vec<Job>, JobPersistenceError> {
        let state = self.lock().map_err(JobPersistenceError::connection)?;
        let mut jobs: Vec<Job> = state
            .jobs
            .values()
            .filter(|job| job.recruiter_id == recruiter_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(paginate(jobs, page))
    }

    async fn search(
        &self,
        criteria: &JobSearchCriteria,
        page: Page,
    ) -> Result<Vec<JobPosting>, JobPersistenceError> {
        let state = self.lock().map_err(JobPersistenceError::connection)?;
        let mut postings: Vec<JobPosting> = state
            .jobs
            .values()
            .filter(|job| job.is_active)
            .map(|job| Self::posting_for(&state, job))
            .filter(|posting| criteria.matches(posting))
            .collect();
        postings.sort_by(|a, b| b.job.posted_at.cmp(&a.job.posted_at));
        Ok(paginate(postings, page))
    }
}

impl InMemoryBackend {
    fn detail_for(
        state: &StoreState,
        application: &Application,
    ) -> Result<ApplicationDetail, ApplicationPersistenceError> {
        let missing = |what: &str| ApplicationPersistenceError::query(format!("{what} not found"));

        let employee = state
            .employees
            .get(application.employee_id.as_uuid())
            .ok_or_else(|| missing("employee"))?;
        let (employee_user, _) = state
            .users
            .get(employee.user_id.as_uuid())
            .ok_or_else(|| missing("employee user"))?;
        let job = state
            .jobs
            .get(application.job_id.as_uuid())
            .ok_or_else(|| missing("job"))?;
        let recruiter = state
            .recruiters
            .get(job.recruiter_id.as_uuid())
            .ok_or_else(|| missing("recruiter"))?;
        let (recruiter_user, _) = state
            .users
            .get(recruiter.user_id.as_uuid())
            .ok_or_else(|| missing("recruiter user"))?;

        Ok(ApplicationDetail {
            application: application.clone(),
            parties: ApplicationParties {
                employee_user_id: employee_user.id(),
                employee_email: employee_user.email().clone(),
                employee_name: employee_user.name().map(str::to_owned),
                recruiter_user_id: recruiter_user.id(),
                recruiter_email: recruiter_user.email().clone(),
                job_id: job.id,
                job_title: job.title.clone(),
            },
        })
    }

    fn summaries(
        state: &StoreState,
        mut applications: Vec<Application>,
        page: Page,
    ) -> Vec<ApplicationSummary> {
        applications.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        paginate(applications, page)
            .into_iter()
            .map(|application| {
                let job_title = state
                    .jobs
                    .get(application.job_id.as_uuid())
                    .map(|job| job.title.clone())
                    .unwrap_or_default();
                ApplicationSummary {
                    application,
                    job_title,
                }
            })
            .collect()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryBackend {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationPersistenceError> {
        let mut state = self.lock().map_err(ApplicationPersistenceError::connection)?;
        // The same uniqueness rule the migration's index enforces.
        if state.applications.values().any(|existing| {
            existing.employee_id == application.employee_id
                && existing.job_id == application.job_id
        }) {
            return Err(ApplicationPersistenceError::duplicate_application(
                "applications_employee_id_job_id_key",
            ));
        }
        state
            .applications
            .insert(*application.id.as_uuid(), application.clone());
        Ok(())
    }

    async fn exists_for_pair(
        &self,
        employee_id: EmployeeId,
        job_id: JobId,
    ) -> Result<bool, ApplicationPersistenceError> {
        let state = self.lock().map_err(ApplicationPersistenceError::connection)?;
        Ok(state
            .applications
            .values()
            .any(|a| a.employee_id == employee_id && a.job_id == job_id))
    }

    async fn find_detail(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationDetail>, ApplicationPersistenceError> {
        let state = self.lock().map_err(ApplicationPersistenceError::connection)?;
        state
            .applications
            .get(id.as_uuid())
            .map(|application| Self::detail_for(&state, application))
            .transpose()
    }

    async fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        changed_by: UserId,
    ) -> Result<(), ApplicationPersistenceError> {
        let mut state = self.lock().map_err(ApplicationPersistenceError::connection)?;
        match state.applications.get_mut(id.as_uuid()) {
            Some(application) => {
                application.update_status(status, changed_by);
                Ok(())
            }
            None => Err(ApplicationPersistenceError::query("application not found")),
        }
    }

    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError> {
        let state = self.lock().map_err(ApplicationPersistenceError::connection)?;
        let applications: Vec<Application> = state
            .applications
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        Ok(Self::summaries(&state, applications, page))
    }

    async fn list_for_recruiter(
        &self,
        recruiter_id: RecruiterId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError> {
        let state = self.lock().map_err(ApplicationPersistenceError::connection)?;
        let applications: Vec<Application> = state
            .applications
            .values()
            .filter(|a| {
                state
                    .jobs
                    .get(a.job_id.as_uuid())
                    .is_some_and(|job| job.recruiter_id == recruiter_id)
            })
            .cloned()
            .collect();
        Ok(Self::summaries(&state, applications, page))
    }

    async fn applied_job_ids(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<JobId>, ApplicationPersistenceError> {
        let state = self.lock().map_err(ApplicationPersistenceError::connection)?;
        Ok(state
            .applications
            .values()
            .filter(|a| a.employee_id == employee_id)
            .map(|a| a.job_id)
            .collect())
    }
}

/// Account service wired over the in-memory backend.
pub type TestAccountService = AccountService<
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
    FixturePasswordHasher,
    RecordingNotificationQueue,
>;
/// Admin service wired over the in-memory backend.
pub type TestAdminService = AdminService<
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
    FixturePasswordHasher,
    RecordingNotificationQueue,
>;
/// Job service wired over the in-memory backend.
pub type TestJobService = JobService<
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
>;
/// Application service wired over the in-memory backend.
pub type TestApplicationService = ApplicationService<
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
    InMemoryBackend,
    RecordingNotificationQueue,
>;

/// Fully wired service stack over one shared in-memory backend.
pub struct TestStack {
    /// Shared store, exposed for direct assertions.
    pub backend: Arc<InMemoryBackend>,
    /// Recording queue, exposed for notification assertions.
    pub queue: Arc<RecordingNotificationQueue>,
    /// Accounts + profiles service.
    pub accounts: TestAccountService,
    /// Jobs service.
    pub jobs: TestJobService,
    /// Applications service.
    pub applications: TestApplicationService,
    /// Admin directory service.
    pub admin: TestAdminService,
}

impl TestStack {
    /// Wire a fresh stack with an empty store and queue.
    pub fn new() -> Self {
        let backend = Arc::new(InMemoryBackend::new());
        let queue = Arc::new(RecordingNotificationQueue::new());
        let hasher = Arc::new(FixturePasswordHasher);

        let accounts = AccountService::new(
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
            hasher,
            Arc::clone(&queue),
        );
        let admin = AdminService::new(
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
            accounts.clone(),
        );
        let jobs = JobService::new(
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
        );
        let applications = ApplicationService::new(
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&backend),
            Arc::clone(&queue),
        );

        Self {
            backend,
            queue,
            accounts,
            jobs,
            applications,
            admin,
        }
    }
}

impl Default for TestStack {
    fn default() -> Self {
        Self::new()
    }
}
