//! Administrative directory domain service.
//!
//! Every operation authorises through the superadmin-only policy gate
//! before touching state, so the contract lives in one place instead of
//! being repeated across handlers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account_service::{
    map_employee_persistence_error, map_recruiter_persistence_error, map_user_persistence_error,
};
use crate::domain::page::Page;
use crate::domain::policy;
use crate::domain::ports::{
    AdminDirectory, EmployeeRepository, NotificationQueue, PasswordHasher, ProvisionUserRequest,
    RecruiterRepository, SignupRequest, UserAccountUpdate, UserRepository,
};
use crate::domain::profile::{EmployeeId, EmployeeProfile, RecruiterId, RecruiterProfile};
use crate::domain::user::{User, UserId};
use crate::domain::Error;

use super::account_service::AccountService;

/// Admin service implementing the administrative directory port.
///
/// Provisioning reuses the account service so provisioned users get the
/// same profile bootstrapping and welcome notification as self-signups.
pub struct AdminService<U, E, R, H, Q> {
    users: Arc<U>,
    employees: Arc<E>,
    recruiters: Arc<R>,
    accounts: AccountService<U, E, R, H, Q>,
}

// Hand-written so cloning only touches the Arcs and puts no bounds on the
// adapter types.
impl<U, E, R, H, Q> Clone for AdminService<U, E, R, H, Q> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            employees: Arc::clone(&self.employees),
            recruiters: Arc::clone(&self.recruiters),
            accounts: self.accounts.clone(),
        }
    }
}

impl<U, E, R, H, Q> AdminService<U, E, R, H, Q> {
    /// Create a new service over the given adapters.
    pub fn new(
        users: Arc<U>,
        employees: Arc<E>,
        recruiters: Arc<R>,
        accounts: AccountService<U, E, R, H, Q>,
    ) -> Self {
        Self {
            users,
            employees,
            recruiters,
            accounts,
        }
    }
}

impl<U, E, R, H, Q> AdminService<U, E, R, H, Q>
where
    U: UserRepository,
    E: EmployeeRepository,
    R: RecruiterRepository,
    H: PasswordHasher,
    Q: NotificationQueue,
{
    async fn require_admin(&self, actor: UserId) -> Result<User, Error> {
        let user = self
            .users
            .find_by_id(actor)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if !policy::can_access_admin_views(&user) {
            return Err(Error::forbidden("administrative access required"));
        }
        Ok(user)
    }
}

#[async_trait]
impl<U, E, R, H, Q> AdminDirectory for AdminService<U, E, R, H, Q>
where
    U: UserRepository,
    E: EmployeeRepository,
    R: RecruiterRepository,
    H: PasswordHasher,
    Q: NotificationQueue,
{
    async fn list_users(&self, actor: UserId, page: Page) -> Result<Vec<User>, Error> {
        self.require_admin(actor).await?;
        self.users
            .list(page)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn provision_user(
        &self,
        actor: UserId,
        request: ProvisionUserRequest,
    ) -> Result<User, Error> {
        self.require_admin(actor).await?;
        self.accounts
            .create_account(SignupRequest {
                email: request.email,
                name: request.name,
                password: request.password,
                role: request.role,
            })
            .await
    }

    async fn update_user(
        &self,
        actor: UserId,
        id: UserId,
        update: UserAccountUpdate,
    ) -> Result<User, Error> {
        self.require_admin(actor).await?;
        let mut user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        // set_role re-derives the privilege flags before the save.
        user.set_role(update.role);
        user.set_active(update.is_active);
        self.users
            .update(&user)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(user)
    }

    async fn delete_user(&self, actor: UserId, id: UserId) -> Result<(), Error> {
        self.require_admin(actor).await?;
        let removed = self
            .users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        if !removed {
            return Err(Error::not_found("user not found"));
        }
        Ok(())
    }

    async fn list_employees(
        &self,
        actor: UserId,
        page: Page,
    ) -> Result<Vec<EmployeeProfile>, Error> {
        self.require_admin(actor).await?;
        self.employees
            .list(page)
            .await
            .map_err(map_employee_persistence_error)
    }

    async fn list_recruiters(
        &self,
        actor: UserId,
        page: Page,
    ) -> Result<Vec<RecruiterProfile>, Error> {
        self.require_admin(actor).await?;
        self.recruiters
            .list(page)
            .await
            .map_err(map_recruiter_persistence_error)
    }

    async fn employee_detail(
        &self,
        actor: UserId,
        id: EmployeeId,
    ) -> Result<EmployeeProfile, Error> {
        self.require_admin(actor).await?;
        self.employees
            .find_by_id(id)
            .await
            .map_err(map_employee_persistence_error)?
            .ok_or_else(|| Error::not_found("employee profile not found"))
    }

    async fn recruiter_detail(
        &self,
        actor: UserId,
        id: RecruiterId,
    ) -> Result<RecruiterProfile, Error> {
        self.require_admin(actor).await?;
        self.recruiters
            .find_by_id(id)
            .await
            .map_err(map_recruiter_persistence_error)?
            .ok_or_else(|| Error::not_found("recruiter profile not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        FixturePasswordHasher, MockEmployeeRepository, MockRecruiterRepository,
        MockUserRepository, RecordingNotificationQueue,
    };
    use crate::domain::role::Role;
    use crate::domain::user::EmailAddress;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    type Service = AdminService<
        MockUserRepository,
        MockEmployeeRepository,
        MockRecruiterRepository,
        FixturePasswordHasher,
        RecordingNotificationQueue,
    >;

    fn service(users: MockUserRepository) -> Service {
        let users = Arc::new(users);
        let employees = Arc::new(MockEmployeeRepository::new());
        let recruiters = Arc::new(MockRecruiterRepository::new());
        let accounts = AccountService::new(
            Arc::clone(&users),
            Arc::clone(&employees),
            Arc::clone(&recruiters),
            Arc::new(FixturePasswordHasher),
            Arc::new(RecordingNotificationQueue::new()),
        );
        AdminService::new(users, employees, recruiters, accounts)
    }

    fn user(role: Role) -> User {
        User::new(
            EmailAddress::new(format!("{role}@example.com")).expect("valid email"),
            None,
            role,
        )
    }

    #[rstest]
    #[case(Role::Employee)]
    #[case(Role::Recruiter)]
    #[case(Role::Subadmin)]
    #[tokio::test]
    async fn non_superadmins_are_denied(#[case] role: Role) {
        let actor = user(role);
        let actor_id = actor.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(actor)));
        users.expect_list().times(0);

        let err = service(users)
            .list_users(actor_id, Page::first(10))
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn role_updates_re_derive_flags_before_saving() {
        let admin = user(Role::Superadmin);
        let admin_id = admin.id();
        let target = user(Role::Employee);
        let target_id = target.id();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .withf(move |id| *id == admin_id)
            .return_once(move |_| Ok(Some(admin)));
        users
            .expect_find_by_id()
            .withf(move |id| *id == target_id)
            .return_once(move |_| Ok(Some(target)));
        users
            .expect_update()
            .withf(|saved| {
                saved.role() == Role::Superadmin
                    && saved.flags().is_staff
                    && saved.flags().is_superuser
            })
            .times(1)
            .return_once(|_| Ok(()));

        let updated = service(users)
            .update_user(
                admin_id,
                target_id,
                UserAccountUpdate {
                    role: Role::Superadmin,
                    is_active: true,
                },
            )
            .await
            .expect("update succeeds");

        assert!(updated.flags().is_superuser);
    }

    #[tokio::test]
    async fn deleting_a_missing_user_is_not_found() {
        let admin = user(Role::Superadmin);
        let admin_id = admin.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(admin)));
        users.expect_delete().return_once(|_| Ok(false));

        let err = service(users)
            .delete_user(admin_id, UserId::random())
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
