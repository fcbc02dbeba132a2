//! Application lifecycle handlers.
//!
//! ```text
//! POST /api/v1/jobs/{id}/apply {"coverLetter":"..."}
//! GET  /api/v1/applications?page=1
//! GET  /api/v1/applications/{id}
//! POST /api/v1/applications/{id}/status {"status":"interview"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::ApplyRequest;
use crate::domain::{
    APPLICATIONS_PAGE_SIZE, Application, ApplicationId, ApplicationStatus, ApplicationSummary,
    Error, JobId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::PageQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Application form body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    /// Optional cover letter.
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// Status transition body.
///
/// The status arrives as a raw string so an unknown value surfaces as the
/// API's own validation failure instead of a deserialisation error.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    /// Target status name.
    pub status: String,
}

/// Application detail scoped to what the viewing party may see.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetailResponse {
    /// The application record.
    pub application: Application,
    /// Title of the job applied to.
    pub job_title: String,
    /// Whether the viewer is the applying employee.
    pub is_employee: bool,
    /// Whether the viewer is the owning recruiter.
    pub is_recruiter: bool,
}

/// Apply to a job as the signed-in employee.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/apply",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an employee", body = Error),
        (status = 404, description = "No such job", body = Error),
        (status = 409, description = "Already applied", body = Error)
    ),
    tags = ["applications"],
    operation_id = "applyForJob"
)]
#[post("/jobs/{id}/apply")]
pub async fn apply_for_job(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<JobId>,
    payload: web::Json<ApplyPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let request = ApplyRequest {
        cover_letter: payload
            .into_inner()
            .cover_letter
            .filter(|letter| !letter.trim().is_empty()),
    };
    let application = state
        .applications
        .apply(actor, path.into_inner(), request)
        .await?;
    Ok(HttpResponse::Created().json(application))
}

/// List the signed-in actor's applications.
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    params(PageQuery),
    responses(
        (status = 200, description = "Applications", body = [ApplicationSummary]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<ApplicationSummary>>> {
    let actor = session.require_user_id()?;
    let page = query.into_inner().resolve(APPLICATIONS_PAGE_SIZE);
    let applications = state.applications.list_applications(actor, page).await?;
    Ok(web::Json(applications))
}

/// Fetch one application; visible to its two parties only.
#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    responses(
        (status = 200, description = "Application detail", body = ApplicationDetailResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a party", body = Error),
        (status = 404, description = "No such application", body = Error)
    ),
    tags = ["applications"],
    operation_id = "applicationDetail"
)]
#[get("/applications/{id}")]
pub async fn application_detail(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<ApplicationId>,
) -> ApiResult<web::Json<ApplicationDetailResponse>> {
    let actor = session.require_user_id()?;
    let detail = state
        .applications
        .application_detail(actor, path.into_inner())
        .await?;
    let is_employee = detail.parties.employee_user_id == actor;
    let is_recruiter = detail.parties.recruiter_user_id == actor;
    Ok(web::Json(ApplicationDetailResponse {
        application: detail.application,
        job_title: detail.parties.job_title,
        is_employee,
        is_recruiter,
    }))
}

/// Move an application to a new status; owning recruiter only.
#[utoipa::path(
    post,
    path = "/api/v1/applications/{id}/status",
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Application),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owning recruiter", body = Error),
        (status = 404, description = "No such application", body = Error)
    ),
    tags = ["applications"],
    operation_id = "updateApplicationStatus"
)]
#[post("/applications/{id}/status")]
pub async fn update_application_status(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<ApplicationId>,
    payload: web::Json<StatusPayload>,
) -> ApiResult<web::Json<Application>> {
    let actor = session.require_user_id()?;
    let raw = payload.into_inner().status;
    let status: ApplicationStatus = raw.parse().map_err(|_| {
        Error::invalid_request(format!("unknown application status: {raw}"))
            .with_details(json!({ "field": "status", "code": "unknown_status" }))
    })?;
    let application = state
        .applications
        .transition_status(actor, path.into_inner(), status)
        .await?;
    Ok(web::Json(application))
}
