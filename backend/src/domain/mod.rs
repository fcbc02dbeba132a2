//! Domain primitives, aggregates, policy, and services.
//!
//! Purpose: define strongly typed entities for the job board and keep every
//! business rule (role-derived privileges, the application lifecycle, the
//! authorisation policy) behind ports so adapters stay thin. Types are
//! immutable where practical and document their invariants in Rustdoc.

mod account_service;
mod admin_service;
pub mod application;
mod application_service;
pub mod error;
pub mod job;
mod job_service;
pub mod notification;
pub mod page;
pub mod policy;
pub mod ports;
pub mod profile;
pub mod role;
pub mod search;
pub mod user;

pub use self::account_service::AccountService;
pub use self::admin_service::AdminService;
pub use self::application::{
    Application, ApplicationDetail, ApplicationId, ApplicationParties, ApplicationStatus,
    ApplicationStatusParseError, ApplicationSummary,
};
pub use self::application_service::ApplicationService;
pub use self::error::{Error, ErrorCode};
pub use self::job::{Job, JobId, JobType, JobTypeParseError, JobValidationError, Salary};
pub use self::job_service::JobService;
pub use self::notification::{Notification, NotificationKind};
pub use self::page::{APPLICATIONS_PAGE_SIZE, JOBS_PAGE_SIZE, Page};
pub use self::profile::{EmployeeId, EmployeeProfile, RecruiterId, RecruiterProfile};
pub use self::role::{PrivilegeFlags, Role, RoleParseError};
pub use self::search::{JobPosting, JobSearchCriteria, RawSearchParams};
pub use self::user::{EmailAddress, User, UserId, UserValidationError};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
