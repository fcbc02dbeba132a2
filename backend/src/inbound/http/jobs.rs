//! Job posting and discovery handlers.
//!
//! ```text
//! GET    /api/v1/jobs?page=1
//! GET    /api/v1/jobs/search?jobTitle=backend&minSalary=90000
//! GET    /api/v1/jobs/{id}
//! POST   /api/v1/jobs
//! PUT    /api/v1/jobs/{id}
//! DELETE /api/v1/jobs/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::JobDraft;
use crate::domain::{
    Error, Job, JobId, JobPosting, JobSearchCriteria, JOBS_PAGE_SIZE, JobType, RawSearchParams,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::PageQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Job form body shared by create and update.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    /// Position title.
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Free-form location.
    #[serde(default)]
    pub location: String,
    /// Employment arrangement.
    pub job_type: String,
    /// Advertised salary in whole currency units.
    #[serde(default)]
    pub salary: Option<i64>,
    /// Optional application deadline.
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
}

impl TryFrom<JobPayload> for JobDraft {
    type Error = Error;

    fn try_from(payload: JobPayload) -> Result<Self, Self::Error> {
        let job_type: JobType = payload.job_type.parse().map_err(|_| {
            Error::invalid_request(format!("unknown job type: {}", payload.job_type))
                .with_details(json!({ "field": "jobType", "code": "unknown_job_type" }))
        })?;
        Ok(Self {
            title: payload.title,
            description: payload.description,
            location: payload.location,
            job_type,
            salary: payload.salary,
            application_deadline: payload.application_deadline,
        })
    }
}

/// One page of the job listing.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    /// Postings on this page.
    pub jobs: Vec<JobPosting>,
    /// Jobs the signed-in employee already applied to.
    pub applied_job_ids: Vec<JobId>,
}

/// Posting detail plus the signed-in employee's application state.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailResponse {
    /// The posting with its company name.
    #[serde(flatten)]
    pub posting: JobPosting,
    /// Whether the signed-in employee already applied.
    pub already_applied: bool,
}

/// List postings: recruiters see their own, everyone else active ones.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(PageQuery),
    responses(
        (status = 200, description = "Job listing", body = JobListResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "listJobs",
    security([])
)]
#[get("/jobs")]
pub async fn list_jobs(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<JobListResponse>> {
    let actor = session.user_id()?;
    let page = query.into_inner().resolve(JOBS_PAGE_SIZE);
    let listing = state.jobs.list_jobs(actor, page).await?;
    Ok(web::Json(JobListResponse {
        jobs: listing.postings,
        applied_job_ids: listing.applied_job_ids,
    }))
}

/// Search active postings with the optional criteria conjunction.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/search",
    responses(
        (status = 200, description = "Matching postings", body = [JobPosting]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "searchJobs",
    security([])
)]
#[get("/jobs/search")]
pub async fn search_jobs(
    state: web::Data<HttpState>,
    params: web::Query<RawSearchParams>,
    page: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<JobPosting>>> {
    let criteria = JobSearchCriteria::from_raw(params.into_inner());
    let page = page.into_inner().resolve(JOBS_PAGE_SIZE);
    let postings = state.jobs.search_jobs(criteria, page).await?;
    Ok(web::Json(postings))
}

/// Fetch one posting.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    responses(
        (status = 200, description = "Job detail", body = JobDetailResponse),
        (status = 404, description = "No such job", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "jobDetail",
    security([])
)]
#[get("/jobs/{id}")]
pub async fn job_detail(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<JobId>,
) -> ApiResult<web::Json<JobDetailResponse>> {
    let actor = session.user_id()?;
    let view = state.jobs.job_detail(actor, path.into_inner()).await?;
    Ok(web::Json(JobDetailResponse {
        posting: view.posting,
        already_applied: view.already_applied,
    }))
}

/// Create a posting owned by the signed-in recruiter.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = JobPayload,
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a recruiter", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "createJob"
)]
#[post("/jobs")]
pub async fn create_job(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<JobPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let draft = JobDraft::try_from(payload.into_inner())?;
    let job = state.jobs.create_job(actor, draft).await?;
    Ok(HttpResponse::Created().json(job))
}

/// Replace a posting's fields; owning recruiter only.
#[utoipa::path(
    put,
    path = "/api/v1/jobs/{id}",
    request_body = JobPayload,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owning recruiter", body = Error),
        (status = 404, description = "No such job", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "updateJob"
)]
#[put("/jobs/{id}")]
pub async fn update_job(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<JobId>,
    payload: web::Json<JobPayload>,
) -> ApiResult<web::Json<Job>> {
    let actor = session.require_user_id()?;
    let draft = JobDraft::try_from(payload.into_inner())?;
    let job = state.jobs.update_job(actor, path.into_inner(), draft).await?;
    Ok(web::Json(job))
}

/// Delete a posting; owning recruiter only.
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    responses(
        (status = 204, description = "Job deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owning recruiter", body = Error),
        (status = 404, description = "No such job", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "deleteJob"
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<JobId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.jobs.delete_job(actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{JobListPage, MockJobsService};
    use crate::domain::{Salary, UserId};
    use crate::inbound::http::test_utils::{authed_request, state_with_jobs, test_login_resource};
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use serde_json::Value;

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
                actix_web::dev::ServiceRequest,
                Config = (),
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
                InitError = (),
            >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(test_login_resource())
            .service(
                web::scope("/api/v1")
                    .service(search_jobs)
                    .service(list_jobs)
                    .service(job_detail)
                    .service(create_job)
                    .service(update_job)
                    .service(delete_job),
            )
    }

    fn posting(title: &str) -> JobPosting {
        JobPosting {
            job: Job::post(
                crate::domain::RecruiterId::random(),
                title.to_owned(),
                String::new(),
                "Remote".to_owned(),
                JobType::FullTime,
                Salary::new(90_000).ok(),
                None,
                Utc::now(),
            )
            .expect("valid job"),
            company_name: "Acme".to_owned(),
        }
    }

    #[actix_web::test]
    async fn anonymous_listing_is_allowed() {
        let mut jobs = MockJobsService::new();
        jobs.expect_list_jobs()
            .withf(|actor, _| actor.is_none())
            .times(1)
            .return_once(|_, _| {
                Ok(JobListPage {
                    postings: vec![posting("Backend Developer")],
                    applied_job_ids: Vec::new(),
                })
            });

        let app = actix_test::init_service(test_app(state_with_jobs(jobs))).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/jobs?page=1")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json body");
        assert_eq!(
            body.get("jobs")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(1)
        );
    }

    #[actix_web::test]
    async fn garbled_search_parameters_are_ignored_not_rejected() {
        let mut jobs = MockJobsService::new();
        jobs.expect_search_jobs()
            .withf(|criteria, _| criteria.min_salary.is_none() && criteria.job_type.is_none())
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));

        let app = actix_test::init_service(test_app(state_with_jobs(jobs))).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/jobs/search?minSalary=lots&jobType=gig")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    }

    #[actix_web::test]
    async fn creating_a_job_requires_a_session() {
        let mut jobs = MockJobsService::new();
        jobs.expect_create_job().times(0);
        let app = actix_test::init_service(test_app(state_with_jobs(jobs))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/jobs")
                .set_json(JobPayload {
                    title: "Backend Developer".to_owned(),
                    description: String::new(),
                    location: String::new(),
                    job_type: "full_time".to_owned(),
                    salary: None,
                    application_deadline: None,
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn unknown_job_type_is_rejected_before_the_service_runs() {
        let actor = UserId::random();
        let mut jobs = MockJobsService::new();
        jobs.expect_create_job().times(0);
        let app = actix_test::init_service(test_app(state_with_jobs(jobs))).await;

        let request = authed_request(
            &app,
            actor,
            actix_test::TestRequest::post()
                .uri("/api/v1/jobs")
                .set_json(JobPayload {
                    title: "Backend Developer".to_owned(),
                    description: String::new(),
                    location: String::new(),
                    job_type: "gig".to_owned(),
                    salary: None,
                    application_deadline: None,
                }),
        )
        .await;
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn deleting_someone_elses_job_is_forbidden() {
        let actor = UserId::random();
        let mut jobs = MockJobsService::new();
        jobs.expect_delete_job()
            .times(1)
            .return_once(|_, _| Err(Error::forbidden("you do not own this job posting")));

        let app = actix_test::init_service(test_app(state_with_jobs(jobs))).await;
        let request = authed_request(
            &app,
            actor,
            actix_test::TestRequest::delete().uri(&format!("/api/v1/jobs/{}", JobId::random())),
        )
        .await;
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
