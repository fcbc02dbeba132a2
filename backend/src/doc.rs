//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the shared
//! error schema, and the session-cookie security scheme. Swagger UI serves
//! the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Application, ApplicationStatus, ApplicationSummary, EmployeeProfile, Error, ErrorCode, Job,
    JobPosting, JobType, RecruiterProfile, Role,
};
use crate::inbound::http::admin::{ProvisionUserPayload, UserUpdatePayload};
use crate::inbound::http::applications::{ApplicationDetailResponse, ApplyPayload, StatusPayload};
use crate::inbound::http::auth::{LoginPayload, SignupPayload};
use crate::inbound::http::dto::UserResponse;
use crate::inbound::http::jobs::{JobDetailResponse, JobListResponse, JobPayload};
use crate::inbound::http::profiles::{EmployeeProfilePayload, RecruiterProfilePayload};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Job board backend API",
        description = "HTTP interface for the job board: accounts, profiles, \
                       postings, applications, and the admin directory."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::profiles::employee_profile,
        crate::inbound::http::profiles::update_employee_profile,
        crate::inbound::http::profiles::recruiter_profile,
        crate::inbound::http::profiles::update_recruiter_profile,
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::search_jobs,
        crate::inbound::http::jobs::job_detail,
        crate::inbound::http::jobs::create_job,
        crate::inbound::http::jobs::update_job,
        crate::inbound::http::jobs::delete_job,
        crate::inbound::http::applications::apply_for_job,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::application_detail,
        crate::inbound::http::applications::update_application_status,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::provision_user,
        crate::inbound::http::admin::update_user,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::list_employees,
        crate::inbound::http::admin::employee_detail,
        crate::inbound::http::admin::list_recruiters,
        crate::inbound::http::admin::recruiter_detail,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        JobType,
        ApplicationStatus,
        UserResponse,
        SignupPayload,
        LoginPayload,
        EmployeeProfile,
        RecruiterProfile,
        EmployeeProfilePayload,
        RecruiterProfilePayload,
        Job,
        JobPosting,
        JobPayload,
        JobListResponse,
        JobDetailResponse,
        Application,
        ApplicationSummary,
        ApplyPayload,
        StatusPayload,
        ApplicationDetailResponse,
        ProvisionUserPayload,
        UserUpdatePayload,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_builds_and_lists_the_core_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;
        assert!(paths.contains_key("/api/v1/signup"));
        assert!(paths.contains_key("/api/v1/jobs/{id}/apply"));
        assert!(paths.contains_key("/api/v1/applications/{id}/status"));
        assert!(paths.contains_key("/health/ready"));
    }
}
