//! Application lifecycle domain service.
//!
//! Owns the creation protocol (apply-for-job) and the status transitions.
//! Every accepted mutation schedules exactly one notification; dispatch is
//! best-effort and never reverses the committed change.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::domain::account_service::{
    map_employee_persistence_error, map_recruiter_persistence_error, map_user_persistence_error,
};
use crate::domain::application::{
    Application, ApplicationDetail, ApplicationId, ApplicationStatus, ApplicationSummary,
};
use crate::domain::job::JobId;
use crate::domain::job_service::map_job_persistence_error;
use crate::domain::notification::Notification;
use crate::domain::page::Page;
use crate::domain::policy;
use crate::domain::ports::{
    ApplicationPersistenceError, ApplicationRepository, ApplicationsService, ApplyRequest,
    EmployeeRepository, JobRepository, NotificationQueue, RecruiterRepository, UserRepository,
};
use crate::domain::role::Role;
use crate::domain::user::{User, UserId};
use crate::domain::Error;

/// Application service implementing the applications driving port.
pub struct ApplicationService<A, J, E, R, U, Q> {
    applications: Arc<A>,
    jobs: Arc<J>,
    employees: Arc<E>,
    recruiters: Arc<R>,
    users: Arc<U>,
    queue: Arc<Q>,
}

// Hand-written so cloning only touches the Arcs and puts no bounds on the
// adapter types.
impl<A, J, E, R, U, Q> Clone for ApplicationService<A, J, E, R, U, Q> {
    fn clone(&self) -> Self {
        Self {
            applications: Arc::clone(&self.applications),
            jobs: Arc::clone(&self.jobs),
            employees: Arc::clone(&self.employees),
            recruiters: Arc::clone(&self.recruiters),
            users: Arc::clone(&self.users),
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<A, J, E, R, U, Q> ApplicationService<A, J, E, R, U, Q> {
    /// Create a new service over the given adapters.
    pub fn new(
        applications: Arc<A>,
        jobs: Arc<J>,
        employees: Arc<E>,
        recruiters: Arc<R>,
        users: Arc<U>,
        queue: Arc<Q>,
    ) -> Self {
        Self {
            applications,
            jobs,
            employees,
            recruiters,
            users,
            queue,
        }
    }
}

pub(crate) fn map_application_persistence_error(error: ApplicationPersistenceError) -> Error {
    match error {
        ApplicationPersistenceError::Connection { message } => Error::service_unavailable(message),
        ApplicationPersistenceError::Query { message } => Error::internal(message),
        ApplicationPersistenceError::DuplicateApplication { .. } => {
            Error::conflict("you have already applied for this job")
        }
    }
}

impl<A, J, E, R, U, Q> ApplicationService<A, J, E, R, U, Q>
where
    A: ApplicationRepository,
    J: JobRepository,
    E: EmployeeRepository,
    R: RecruiterRepository,
    U: UserRepository,
    Q: NotificationQueue,
{
    async fn load_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn load_detail(&self, id: ApplicationId) -> Result<ApplicationDetail, Error> {
        self.applications
            .find_detail(id)
            .await
            .map_err(map_application_persistence_error)?
            .ok_or_else(|| Error::not_found("application not found"))
    }

    async fn enqueue_best_effort(&self, notification: Notification) {
        if let Err(error) = self.queue.enqueue(&notification).await {
            // Best-effort: delivery failure never rolls back the mutation.
            warn!(%error, kind = ?notification.kind(), "notification dispatch failed");
        }
    }
}

#[async_trait]
impl<A, J, E, R, U, Q> ApplicationsService for ApplicationService<A, J, E, R, U, Q>
where
    A: ApplicationRepository,
    J: JobRepository,
    E: EmployeeRepository,
    R: RecruiterRepository,
    U: UserRepository,
    Q: NotificationQueue,
{
    async fn apply(
        &self,
        actor: UserId,
        job_id: JobId,
        request: ApplyRequest,
    ) -> Result<Application, Error> {
        let user = self.load_user(actor).await?;
        if user.role() != Role::Employee {
            return Err(Error::forbidden("only employees can apply for jobs"));
        }
        let profile = self
            .employees
            .find_by_user(user.id())
            .await
            .map_err(map_employee_persistence_error)?
            .ok_or_else(|| Error::not_found("employee profile not found"))?;
        let posting = self
            .jobs
            .find_by_id(job_id)
            .await
            .map_err(map_job_persistence_error)?
            .ok_or_else(|| Error::not_found("job not found"))?;

        // Friendly pre-check; the unique (employee_id, job_id) index is what
        // actually closes the concurrent double-submission race.
        if self
            .applications
            .exists_for_pair(profile.id, posting.job.id)
            .await
            .map_err(map_application_persistence_error)?
        {
            return Err(Error::conflict("you have already applied for this job"));
        }

        let application =
            Application::submit(profile.id, posting.job.id, request.cover_letter, Utc::now());
        self.applications
            .insert(&application)
            .await
            .map_err(map_application_persistence_error)?;

        if let Some(detail) = self
            .applications
            .find_detail(application.id)
            .await
            .map_err(map_application_persistence_error)?
        {
            self.enqueue_best_effort(Notification::NewApplication {
                recipient: detail.parties.recruiter_email,
                applicant_name: user.display_name().to_owned(),
                job_title: detail.parties.job_title,
                job_id: detail.parties.job_id,
            })
            .await;
        }

        Ok(application)
    }

    async fn list_applications(
        &self,
        actor: UserId,
        page: Page,
    ) -> Result<Vec<ApplicationSummary>, Error> {
        let user = self.load_user(actor).await?;
        match user.role() {
            Role::Employee => {
                let profile = self
                    .employees
                    .find_by_user(user.id())
                    .await
                    .map_err(map_employee_persistence_error)?
                    .ok_or_else(|| Error::not_found("employee profile not found"))?;
                self.applications
                    .list_for_employee(profile.id, page)
                    .await
                    .map_err(map_application_persistence_error)
            }
            Role::Recruiter => {
                let profile = self
                    .recruiters
                    .find_by_user(user.id())
                    .await
                    .map_err(map_recruiter_persistence_error)?
                    .ok_or_else(|| Error::not_found("recruiter profile not found"))?;
                self.applications
                    .list_for_recruiter(profile.id, page)
                    .await
                    .map_err(map_application_persistence_error)
            }
            Role::Subadmin | Role::Superadmin => Err(Error::forbidden(
                "application listings are scoped to employees and recruiters",
            )),
        }
    }

    async fn application_detail(
        &self,
        actor: UserId,
        id: ApplicationId,
    ) -> Result<ApplicationDetail, Error> {
        let detail = self.load_detail(id).await?;
        let user = self.load_user(actor).await?;
        if !policy::can_view_application(&user, &detail.parties) {
            return Err(Error::forbidden("you are not a party to this application"));
        }
        Ok(detail)
    }

    async fn transition_status(
        &self,
        actor: UserId,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, Error> {
        let detail = self.load_detail(id).await?;
        let user = self.load_user(actor).await?;
        if !policy::can_transition_application(&user, &detail.parties) {
            return Err(Error::forbidden(
                "only the owning recruiter can update this application",
            ));
        }

        let previous_status = detail.application.status;
        self.applications
            .update_status(id, status, user.id())
            .await
            .map_err(map_application_persistence_error)?;

        let mut application = detail.application;
        application.update_status(status, user.id());

        self.enqueue_best_effort(Notification::StatusUpdate {
            recipient: detail.parties.employee_email,
            previous_status,
            new_status: status,
            job_title: detail.parties.job_title,
            application_id: application.id,
        })
        .await;

        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::application::ApplicationParties;
    use crate::domain::job::{Job, JobType};
    use crate::domain::notification::NotificationKind;
    use crate::domain::ports::{
        MockApplicationRepository, MockEmployeeRepository, MockJobRepository,
        MockRecruiterRepository, MockUserRepository, RecordingNotificationQueue,
    };
    use crate::domain::profile::{EmployeeProfile, RecruiterId};
    use crate::domain::search::JobPosting;
    use crate::domain::user::EmailAddress;
    use crate::domain::ErrorCode;

    type Service = ApplicationService<
        MockApplicationRepository,
        MockJobRepository,
        MockEmployeeRepository,
        MockRecruiterRepository,
        MockUserRepository,
        RecordingNotificationQueue,
    >;

    struct Fixture {
        applications: MockApplicationRepository,
        jobs: MockJobRepository,
        employees: MockEmployeeRepository,
        recruiters: MockRecruiterRepository,
        users: MockUserRepository,
        queue: Arc<RecordingNotificationQueue>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                applications: MockApplicationRepository::new(),
                jobs: MockJobRepository::new(),
                employees: MockEmployeeRepository::new(),
                recruiters: MockRecruiterRepository::new(),
                users: MockUserRepository::new(),
                queue: Arc::new(RecordingNotificationQueue::new()),
            }
        }

        fn with_user(mut self, user: User) -> Self {
            self.users
                .expect_find_by_id()
                .returning(move |_| Ok(Some(user.clone())));
            self
        }

        fn build(self) -> (Service, Arc<RecordingNotificationQueue>) {
            let queue = Arc::clone(&self.queue);
            (
                ApplicationService::new(
                    Arc::new(self.applications),
                    Arc::new(self.jobs),
                    Arc::new(self.employees),
                    Arc::new(self.recruiters),
                    Arc::new(self.users),
                    self.queue,
                ),
                queue,
            )
        }
    }

    fn user(role: Role) -> User {
        User::new(
            EmailAddress::new(format!("{role}@example.com")).expect("valid email"),
            Some(format!("{role} person")),
            role,
        )
    }

    fn posting() -> JobPosting {
        JobPosting {
            job: Job::post(
                RecruiterId::random(),
                "Backend Developer".to_owned(),
                String::new(),
                "Remote".to_owned(),
                JobType::FullTime,
                None,
                None,
                Utc::now(),
            )
            .expect("valid job"),
            company_name: "Acme".to_owned(),
        }
    }

    fn detail_for(application: Application, employee: &User, recruiter: &User) -> ApplicationDetail {
        ApplicationDetail {
            parties: ApplicationParties {
                employee_user_id: employee.id(),
                employee_email: employee.email().clone(),
                employee_name: employee.name().map(str::to_owned),
                recruiter_user_id: recruiter.id(),
                recruiter_email: recruiter.email().clone(),
                job_id: application.job_id,
                job_title: "Backend Developer".to_owned(),
            },
            application,
        }
    }

    #[tokio::test]
    async fn applying_twice_is_a_conflict_and_inserts_nothing() {
        let employee = user(Role::Employee);
        let employee_id = employee.id();
        let profile = EmployeeProfile::empty(employee_id);
        let target = posting();
        let job_id = target.job.id;

        let mut fixture = Fixture::new().with_user(employee);
        fixture
            .employees
            .expect_find_by_user()
            .return_once(move |_| Ok(Some(profile)));
        fixture
            .jobs
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(target)));
        fixture
            .applications
            .expect_exists_for_pair()
            .return_once(|_, _| Ok(true));
        fixture.applications.expect_insert().times(0);

        let (service, queue) = fixture.build();
        let err = service
            .apply(employee_id, job_id, ApplyRequest::default())
            .await
            .expect_err("duplicate application");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(queue.sent().is_empty());
    }

    #[tokio::test]
    async fn a_raced_duplicate_insert_still_surfaces_a_conflict() {
        let employee = user(Role::Employee);
        let employee_id = employee.id();
        let profile = EmployeeProfile::empty(employee_id);
        let target = posting();
        let job_id = target.job.id;

        let mut fixture = Fixture::new().with_user(employee);
        fixture
            .employees
            .expect_find_by_user()
            .return_once(move |_| Ok(Some(profile)));
        fixture
            .jobs
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(target)));
        fixture
            .applications
            .expect_exists_for_pair()
            .return_once(|_, _| Ok(false));
        fixture.applications.expect_insert().return_once(|_| {
            Err(ApplicationPersistenceError::duplicate_application(
                "applications_employee_id_job_id_key",
            ))
        });

        let (service, queue) = fixture.build();
        let err = service
            .apply(employee_id, job_id, ApplyRequest::default())
            .await
            .expect_err("raced duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(queue.sent().is_empty());
    }

    #[tokio::test]
    async fn a_successful_apply_notifies_the_recruiter_once() {
        let employee = user(Role::Employee);
        let recruiter = user(Role::Recruiter);
        let employee_id = employee.id();
        let profile = EmployeeProfile::empty(employee_id);
        let target = posting();
        let job_id = target.job.id;
        let recruiter_for_detail = recruiter.clone();
        let employee_for_detail = employee.clone();

        let mut fixture = Fixture::new().with_user(employee);
        fixture
            .employees
            .expect_find_by_user()
            .return_once(move |_| Ok(Some(profile)));
        fixture
            .jobs
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(target)));
        fixture
            .applications
            .expect_exists_for_pair()
            .return_once(|_, _| Ok(false));
        fixture
            .applications
            .expect_insert()
            .times(1)
            .return_once(|_| Ok(()));
        fixture.applications.expect_find_detail().return_once(move |id| {
            let application = Application {
                id,
                ..Application::submit(
                    EmployeeProfile::empty(employee_for_detail.id()).id,
                    job_id,
                    None,
                    Utc::now(),
                )
            };
            Ok(Some(detail_for(
                application,
                &employee_for_detail,
                &recruiter_for_detail,
            )))
        });

        let (service, queue) = fixture.build();
        let application = service
            .apply(employee_id, job_id, ApplyRequest::default())
            .await
            .expect("apply succeeds");

        assert_eq!(application.status, ApplicationStatus::Submitted);
        let sent = queue.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            Notification::NewApplication {
                recipient,
                applicant_name,
                job_title,
                job_id: notified_job,
            } => {
                assert_eq!(recipient, recruiter.email());
                assert_eq!(applicant_name, "employee person");
                assert_eq!(job_title, "Backend Developer");
                assert_eq!(*notified_job, job_id);
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn only_the_owning_recruiter_can_transition() {
        let employee = user(Role::Employee);
        let recruiter = user(Role::Recruiter);
        let intruder = user(Role::Recruiter);
        let intruder_id = intruder.id();
        let application = Application::submit(
            EmployeeProfile::empty(employee.id()).id,
            JobId::random(),
            None,
            Utc::now(),
        );
        let application_id = application.id;
        let detail = detail_for(application, &employee, &recruiter);

        let mut fixture = Fixture::new().with_user(intruder);
        fixture
            .applications
            .expect_find_detail()
            .return_once(move |_| Ok(Some(detail)));
        fixture.applications.expect_update_status().times(0);

        let (service, queue) = fixture.build();
        let err = service
            .transition_status(intruder_id, application_id, ApplicationStatus::Interview)
            .await
            .expect_err("denied");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert!(queue.sent().is_empty());
    }

    #[tokio::test]
    async fn an_accepted_transition_records_actor_and_notifies_the_employee() {
        let employee = user(Role::Employee);
        let recruiter = user(Role::Recruiter);
        let recruiter_id = recruiter.id();
        let application = Application::submit(
            EmployeeProfile::empty(employee.id()).id,
            JobId::random(),
            None,
            Utc::now(),
        );
        let application_id = application.id;
        let detail = detail_for(application, &employee, &recruiter);

        let mut fixture = Fixture::new().with_user(recruiter);
        fixture
            .applications
            .expect_find_detail()
            .return_once(move |_| Ok(Some(detail)));
        fixture
            .applications
            .expect_update_status()
            .withf(move |id, status, changed_by| {
                *id == application_id
                    && *status == ApplicationStatus::Interview
                    && *changed_by == recruiter_id
            })
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let (service, queue) = fixture.build();
        let updated = service
            .transition_status(recruiter_id, application_id, ApplicationStatus::Interview)
            .await
            .expect("transition succeeds");

        assert_eq!(updated.status, ApplicationStatus::Interview);
        assert_eq!(updated.status_changed_by, Some(recruiter_id));

        let sent = queue.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            Notification::StatusUpdate {
                recipient,
                previous_status,
                new_status,
                job_title,
                application_id: notified_id,
            } => {
                assert_eq!(recipient, employee.email());
                assert_eq!(*previous_status, ApplicationStatus::Submitted);
                assert_eq!(*new_status, ApplicationStatus::Interview);
                assert_eq!(job_title, "Backend Developer");
                assert_eq!(*notified_id, application_id);
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn strangers_cannot_view_application_details() {
        let employee = user(Role::Employee);
        let recruiter = user(Role::Recruiter);
        let stranger = user(Role::Employee);
        let stranger_id = stranger.id();
        let application = Application::submit(
            EmployeeProfile::empty(employee.id()).id,
            JobId::random(),
            None,
            Utc::now(),
        );
        let application_id = application.id;
        let detail = detail_for(application, &employee, &recruiter);

        let mut fixture = Fixture::new().with_user(stranger);
        fixture
            .applications
            .expect_find_detail()
            .return_once(move |_| Ok(Some(detail)));

        let (service, _queue) = fixture.build();
        let err = service
            .application_detail(stranger_id, application_id)
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
