//! Identity and profile domain services.
//!
//! Implements the accounts and profiles driving ports over the user and
//! profile repositories. Credential handling delegates to the
//! `PasswordHasher` port; the welcome notification is enqueued best-effort
//! and never blocks the signup that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::domain::notification::Notification;
use crate::domain::ports::{
    AccountsService, EmployeePersistenceError, EmployeeRepository, NotificationQueue,
    PasswordHashError, PasswordHasher, ProfilesService, RecruiterPersistenceError,
    RecruiterRepository, SignupRequest, UserPersistenceError, UserRepository,
    EmployeeProfileUpdate, RecruiterProfileUpdate,
};
use crate::domain::profile::{EmployeeProfile, RecruiterProfile};
use crate::domain::role::Role;
use crate::domain::user::{EmailAddress, User, UserId};
use crate::domain::Error;

/// Account service implementing the accounts and profiles driving ports.
pub struct AccountService<U, E, R, H, Q> {
    users: Arc<U>,
    employees: Arc<E>,
    recruiters: Arc<R>,
    hasher: Arc<H>,
    queue: Arc<Q>,
}

// Hand-written so cloning only touches the Arcs and puts no bounds on the
// adapter types.
impl<U, E, R, H, Q> Clone for AccountService<U, E, R, H, Q> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            employees: Arc::clone(&self.employees),
            recruiters: Arc::clone(&self.recruiters),
            hasher: Arc::clone(&self.hasher),
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<U, E, R, H, Q> AccountService<U, E, R, H, Q> {
    /// Create a new service over the given adapters.
    pub fn new(
        users: Arc<U>,
        employees: Arc<E>,
        recruiters: Arc<R>,
        hasher: Arc<H>,
        queue: Arc<Q>,
    ) -> Self {
        Self {
            users,
            employees,
            recruiters,
            hasher,
            queue,
        }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("an account with email {email} already exists"))
        }
    }
}

pub(crate) fn map_employee_persistence_error(error: EmployeePersistenceError) -> Error {
    match error {
        EmployeePersistenceError::Connection { message } => Error::service_unavailable(message),
        EmployeePersistenceError::Query { message } => Error::internal(message),
    }
}

pub(crate) fn map_recruiter_persistence_error(error: RecruiterPersistenceError) -> Error {
    match error {
        RecruiterPersistenceError::Connection { message } => Error::service_unavailable(message),
        RecruiterPersistenceError::Query { message } => Error::internal(message),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    let PasswordHashError::Hash { message } = error;
    Error::internal(format!("credential hashing failed: {message}"))
}

impl<U, E, R, H, Q> AccountService<U, E, R, H, Q>
where
    U: UserRepository,
    E: EmployeeRepository,
    R: RecruiterRepository,
    H: PasswordHasher,
    Q: NotificationQueue,
{
    async fn load_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn require_role(&self, id: UserId, role: Role) -> Result<User, Error> {
        let user = self.load_user(id).await?;
        if user.role() != role {
            return Err(Error::forbidden(format!(
                "this operation requires the {role} role"
            )));
        }
        Ok(user)
    }

    /// Create the role-matching empty profile for a fresh account.
    async fn create_profile_for(&self, user: &User) -> Result<(), Error> {
        match user.role() {
            Role::Employee => self
                .employees
                .upsert(&EmployeeProfile::empty(user.id()))
                .await
                .map_err(map_employee_persistence_error),
            Role::Recruiter => self
                .recruiters
                .upsert(&RecruiterProfile::empty(user.id(), Utc::now()))
                .await
                .map_err(map_recruiter_persistence_error),
            Role::Subadmin | Role::Superadmin => Ok(()),
        }
    }

    async fn enqueue_best_effort(&self, notification: Notification) {
        if let Err(error) = self.queue.enqueue(&notification).await {
            // Best-effort: a broken queue must never fail the state change.
            warn!(%error, kind = ?notification.kind(), "notification dispatch failed");
        }
    }

    /// Shared by signup and administrative provisioning.
    pub(crate) async fn create_account(&self, request: SignupRequest) -> Result<User, Error> {
        if self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(map_user_persistence_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "an account with email {} already exists",
                request.email
            )));
        }

        let password_hash = self.hasher.hash(&request.password).map_err(map_hash_error)?;
        let user = User::new(request.email, request.name, request.role);

        // The unique email column still closes the check-then-insert race.
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_persistence_error)?;
        self.create_profile_for(&user).await?;

        self.enqueue_best_effort(Notification::Welcome {
            recipient: user.email().clone(),
            name: user.name().map(str::to_owned),
            role: user.role(),
        })
        .await;

        Ok(user)
    }
}

#[async_trait]
impl<U, E, R, H, Q> AccountsService for AccountService<U, E, R, H, Q>
where
    U: UserRepository,
    E: EmployeeRepository,
    R: RecruiterRepository,
    H: PasswordHasher,
    Q: NotificationQueue,
{
    async fn sign_up(&self, request: SignupRequest) -> Result<User, Error> {
        if request.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        self.create_account(request).await
    }

    async fn authenticate(&self, email: &EmailAddress, password: &str) -> Result<User, Error> {
        let denied = || Error::unauthorized("invalid email or password");

        let Some((user, password_hash)) = self
            .users
            .credentials_by_email(email)
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Err(denied());
        };

        if !self.hasher.verify(password, &password_hash) {
            return Err(denied());
        }
        if !user.is_active() {
            return Err(denied());
        }
        Ok(user)
    }

    async fn fetch_user(&self, id: UserId) -> Result<User, Error> {
        self.load_user(id).await
    }
}

#[async_trait]
impl<U, E, R, H, Q> ProfilesService for AccountService<U, E, R, H, Q>
where
    U: UserRepository,
    E: EmployeeRepository,
    R: RecruiterRepository,
    H: PasswordHasher,
    Q: NotificationQueue,
{
    async fn employee_profile(&self, actor: UserId) -> Result<EmployeeProfile, Error> {
        let user = self.require_role(actor, Role::Employee).await?;

        if let Some(profile) = self
            .employees
            .find_by_user(user.id())
            .await
            .map_err(map_employee_persistence_error)?
        {
            return Ok(profile);
        }

        let profile = EmployeeProfile::empty(user.id());
        self.employees
            .upsert(&profile)
            .await
            .map_err(map_employee_persistence_error)?;
        Ok(profile)
    }

    async fn update_employee_profile(
        &self,
        actor: UserId,
        update: EmployeeProfileUpdate,
    ) -> Result<EmployeeProfile, Error> {
        let mut profile = self.employee_profile(actor).await?;
        profile.resume = update.resume;
        profile.phone_number = update.phone_number;
        profile.location = update.location;

        self.employees
            .upsert(&profile)
            .await
            .map_err(map_employee_persistence_error)?;
        Ok(profile)
    }

    async fn recruiter_profile(&self, actor: UserId) -> Result<RecruiterProfile, Error> {
        let user = self.require_role(actor, Role::Recruiter).await?;

        if let Some(profile) = self
            .recruiters
            .find_by_user(user.id())
            .await
            .map_err(map_recruiter_persistence_error)?
        {
            return Ok(profile);
        }

        let profile = RecruiterProfile::empty(user.id(), Utc::now());
        self.recruiters
            .upsert(&profile)
            .await
            .map_err(map_recruiter_persistence_error)?;
        Ok(profile)
    }

    async fn update_recruiter_profile(
        &self,
        actor: UserId,
        update: RecruiterProfileUpdate,
    ) -> Result<RecruiterProfile, Error> {
        let mut profile = self.recruiter_profile(actor).await?;
        profile.company_name = update.company_name;
        profile.website = update.website;
        profile.logo = update.logo;
        profile.updated_at = Utc::now();

        self.recruiters
            .upsert(&profile)
            .await
            .map_err(map_recruiter_persistence_error)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::notification::NotificationKind;
    use crate::domain::ports::{
        FixturePasswordHasher, MockEmployeeRepository, MockRecruiterRepository,
        MockUserRepository, RecordingNotificationQueue,
    };
    use crate::domain::ErrorCode;

    type Service = AccountService<
        MockUserRepository,
        MockEmployeeRepository,
        MockRecruiterRepository,
        FixturePasswordHasher,
        RecordingNotificationQueue,
    >;

    struct Fixture {
        users: MockUserRepository,
        employees: MockEmployeeRepository,
        recruiters: MockRecruiterRepository,
        queue: Arc<RecordingNotificationQueue>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                employees: MockEmployeeRepository::new(),
                recruiters: MockRecruiterRepository::new(),
                queue: Arc::new(RecordingNotificationQueue::new()),
            }
        }

        fn build(self) -> (Service, Arc<RecordingNotificationQueue>) {
            let queue = Arc::clone(&self.queue);
            (
                AccountService::new(
                    Arc::new(self.users),
                    Arc::new(self.employees),
                    Arc::new(self.recruiters),
                    Arc::new(FixturePasswordHasher),
                    self.queue,
                ),
                queue,
            )
        }
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).expect("valid email")
    }

    fn signup(role: Role) -> SignupRequest {
        SignupRequest {
            email: email("ada@example.com"),
            name: Some("Ada".to_owned()),
            password: "secret".to_owned(),
            role,
        }
    }

    #[tokio::test]
    async fn signup_creates_profile_and_schedules_welcome() {
        let mut fixture = Fixture::new();
        fixture
            .users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        fixture
            .users
            .expect_insert()
            .withf(|user, hash| user.role() == Role::Employee && hash.starts_with("plain:"))
            .times(1)
            .return_once(|_, _| Ok(()));
        fixture
            .employees
            .expect_upsert()
            .times(1)
            .return_once(|_| Ok(()));

        let (service, queue) = fixture.build();
        let user = service
            .sign_up(signup(Role::Employee))
            .await
            .expect("signup succeeds");

        assert_eq!(user.role(), Role::Employee);
        let sent = queue.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind(), NotificationKind::Welcome);
    }

    #[tokio::test]
    async fn signup_with_taken_email_is_a_conflict() {
        let mut fixture = Fixture::new();
        let existing = User::new(email("ada@example.com"), None, Role::Employee);
        fixture
            .users
            .expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));

        let (service, queue) = fixture.build();
        let err = service
            .sign_up(signup(Role::Employee))
            .await
            .expect_err("duplicate email");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(queue.sent().is_empty());
    }

    #[tokio::test]
    async fn duplicate_insert_race_still_surfaces_a_conflict() {
        let mut fixture = Fixture::new();
        fixture
            .users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        fixture.users.expect_insert().times(1).return_once(|_, _| {
            Err(UserPersistenceError::duplicate_email("ada@example.com"))
        });

        let (service, _queue) = fixture.build();
        let err = service
            .sign_up(signup(Role::Recruiter))
            .await
            .expect_err("duplicate insert");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password_and_inactive_accounts() {
        let mut fixture = Fixture::new();
        let mut stored = User::new(email("ada@example.com"), None, Role::Employee);
        stored.set_active(false);
        fixture
            .users
            .expect_credentials_by_email()
            .times(2)
            .returning(move |_| Ok(Some((stored.clone(), "plain:secret".to_owned()))));

        let (service, _queue) = fixture.build();

        let wrong = service
            .authenticate(&email("ada@example.com"), "nope")
            .await
            .expect_err("wrong password");
        assert_eq!(wrong.code(), ErrorCode::Unauthorized);

        let inactive = service
            .authenticate(&email("ada@example.com"), "secret")
            .await
            .expect_err("inactive account");
        assert_eq!(inactive.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn employee_profile_is_created_lazily() {
        let mut fixture = Fixture::new();
        let user = User::new(email("ada@example.com"), None, Role::Employee);
        let user_id = user.id();
        fixture
            .users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        fixture
            .employees
            .expect_find_by_user()
            .times(1)
            .return_once(|_| Ok(None));
        fixture
            .employees
            .expect_upsert()
            .times(1)
            .return_once(|_| Ok(()));

        let (service, _queue) = fixture.build();
        let profile = service
            .employee_profile(user_id)
            .await
            .expect("profile materialises");
        assert_eq!(profile.user_id, user_id);
        assert!(profile.phone_number.is_empty());
    }

    #[tokio::test]
    async fn recruiter_profile_requires_the_recruiter_role() {
        let mut fixture = Fixture::new();
        let user = User::new(email("ada@example.com"), None, Role::Employee);
        let user_id = user.id();
        fixture
            .users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let (service, _queue) = fixture.build();
        let err = service
            .recruiter_profile(user_id)
            .await
            .expect_err("role mismatch");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
