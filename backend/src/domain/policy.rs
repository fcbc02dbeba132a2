//! Authorisation policy consulted by every entry point.
//!
//! All checks live here rather than inline in handlers so the access-control
//! contract can be tested in one place. Every predicate is pure over
//! already-loaded state; callers translate a `false` into
//! [`Error::forbidden`](super::Error::forbidden), never into a panic.

use super::application::ApplicationParties;
use super::job::Job;
use super::profile::RecruiterProfile;
use super::role::Role;
use super::user::User;

/// May the actor create, edit, or delete this job?
///
/// Requires the recruiter role and ownership of the job through the actor's
/// recruiter profile.
pub fn can_manage_job(actor: &User, recruiter: &RecruiterProfile, job: &Job) -> bool {
    actor.role() == Role::Recruiter
        && recruiter.user_id == actor.id()
        && job.recruiter_id == recruiter.id
}

/// May the actor view this application?
///
/// Only the applying employee's user and the owning recruiter's user may.
pub fn can_view_application(actor: &User, parties: &ApplicationParties) -> bool {
    actor.id() == parties.employee_user_id || actor.id() == parties.recruiter_user_id
}

/// May the actor change this application's status?
///
/// Only the owning recruiter's user may; the employee can only read.
pub fn can_transition_application(actor: &User, parties: &ApplicationParties) -> bool {
    actor.id() == parties.recruiter_user_id
}

/// May the actor access the administrative views?
pub fn can_access_admin_views(actor: &User) -> bool {
    actor.role() == Role::Superadmin
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::application::ApplicationParties;
    use crate::domain::job::{JobId, JobType};
    use crate::domain::user::{EmailAddress, UserId};
    use chrono::Utc;
    use rstest::rstest;

    fn user(role: Role) -> User {
        User::new(
            EmailAddress::new(format!("{role}@example.com")).expect("valid email"),
            None,
            role,
        )
    }

    fn recruiter_profile(user_id: UserId) -> RecruiterProfile {
        RecruiterProfile::empty(user_id, Utc::now())
    }

    fn job_owned_by(recruiter: &RecruiterProfile) -> Job {
        Job::post(
            recruiter.id,
            "Backend Developer".to_owned(),
            String::new(),
            "Remote".to_owned(),
            JobType::FullTime,
            None,
            None,
            Utc::now(),
        )
        .expect("valid job")
    }

    fn parties(employee_user_id: UserId, recruiter_user_id: UserId) -> ApplicationParties {
        ApplicationParties {
            employee_user_id,
            employee_email: EmailAddress::new("applicant@example.com").expect("valid email"),
            employee_name: None,
            recruiter_user_id,
            recruiter_email: EmailAddress::new("owner@example.com").expect("valid email"),
            job_id: JobId::random(),
            job_title: "Backend Developer".to_owned(),
        }
    }

    #[test]
    fn owning_recruiter_may_manage_their_job() {
        let actor = user(Role::Recruiter);
        let profile = recruiter_profile(actor.id());
        let job = job_owned_by(&profile);
        assert!(can_manage_job(&actor, &profile, &job));
    }

    #[rstest]
    #[case(Role::Employee)]
    #[case(Role::Subadmin)]
    #[case(Role::Superadmin)]
    fn non_recruiters_may_never_manage_jobs(#[case] role: Role) {
        let actor = user(role);
        let profile = recruiter_profile(actor.id());
        let job = job_owned_by(&profile);
        assert!(!can_manage_job(&actor, &profile, &job));
    }

    #[test]
    fn a_recruiter_may_not_manage_another_recruiters_job() {
        let actor = user(Role::Recruiter);
        let own_profile = recruiter_profile(actor.id());
        let other_profile = recruiter_profile(UserId::random());
        let foreign_job = job_owned_by(&other_profile);
        assert!(!can_manage_job(&actor, &own_profile, &foreign_job));
    }

    #[test]
    fn both_parties_may_view_an_application() {
        let employee = user(Role::Employee);
        let recruiter = user(Role::Recruiter);
        let parties = parties(employee.id(), recruiter.id());

        assert!(can_view_application(&employee, &parties));
        assert!(can_view_application(&recruiter, &parties));

        let stranger = user(Role::Employee);
        assert!(!can_view_application(&stranger, &parties));
    }

    #[test]
    fn only_the_owning_recruiter_may_transition() {
        let employee = user(Role::Employee);
        let recruiter = user(Role::Recruiter);
        let parties = parties(employee.id(), recruiter.id());

        assert!(can_transition_application(&recruiter, &parties));
        assert!(!can_transition_application(&employee, &parties));
    }

    #[rstest]
    #[case(Role::Employee, false)]
    #[case(Role::Recruiter, false)]
    #[case(Role::Subadmin, false)]
    #[case(Role::Superadmin, true)]
    fn admin_views_are_superadmin_only(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(can_access_admin_views(&user(role)), allowed);
    }
}
