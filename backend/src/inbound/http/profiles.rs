//! Own-profile handlers for employees and recruiters.
//!
//! ```text
//! GET /api/v1/employee/profile
//! PUT /api/v1/employee/profile {"phoneNumber":"...","location":"..."}
//! GET /api/v1/recruiter/profile
//! PUT /api/v1/recruiter/profile {"companyName":"..."}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{EmployeeProfileUpdate, RecruiterProfileUpdate};
use crate::domain::{EmployeeProfile, Error, RecruiterProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Employee profile form body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfilePayload {
    /// Reference to an uploaded resume artifact.
    #[serde(default)]
    pub resume: Option<String>,
    /// Contact phone number.
    pub phone_number: String,
    /// Free-form location.
    pub location: String,
}

/// Recruiter profile form body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfilePayload {
    /// Company name shown on postings.
    pub company_name: String,
    /// Company website.
    #[serde(default)]
    pub website: Option<String>,
    /// Reference to an uploaded logo artifact.
    #[serde(default)]
    pub logo: Option<String>,
}

/// Fetch (lazily creating) the signed-in employee's profile.
#[utoipa::path(
    get,
    path = "/api/v1/employee/profile",
    responses(
        (status = 200, description = "Employee profile", body = EmployeeProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an employee", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "employeeProfile"
)]
#[get("/employee/profile")]
pub async fn employee_profile(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<EmployeeProfile>> {
    let actor = session.require_user_id()?;
    let profile = state.profiles.employee_profile(actor).await?;
    Ok(web::Json(profile))
}

/// Update the signed-in employee's profile.
#[utoipa::path(
    put,
    path = "/api/v1/employee/profile",
    request_body = EmployeeProfilePayload,
    responses(
        (status = 200, description = "Updated employee profile", body = EmployeeProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an employee", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "updateEmployeeProfile"
)]
#[put("/employee/profile")]
pub async fn update_employee_profile(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<EmployeeProfilePayload>,
) -> ApiResult<web::Json<EmployeeProfile>> {
    let actor = session.require_user_id()?;
    let payload = payload.into_inner();
    let profile = state
        .profiles
        .update_employee_profile(
            actor,
            EmployeeProfileUpdate {
                resume: payload.resume,
                phone_number: payload.phone_number,
                location: payload.location,
            },
        )
        .await?;
    Ok(web::Json(profile))
}

/// Fetch (lazily creating) the signed-in recruiter's profile.
#[utoipa::path(
    get,
    path = "/api/v1/recruiter/profile",
    responses(
        (status = 200, description = "Recruiter profile", body = RecruiterProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a recruiter", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "recruiterProfile"
)]
#[get("/recruiter/profile")]
pub async fn recruiter_profile(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<RecruiterProfile>> {
    let actor = session.require_user_id()?;
    let profile = state.profiles.recruiter_profile(actor).await?;
    Ok(web::Json(profile))
}

/// Update the signed-in recruiter's profile.
#[utoipa::path(
    put,
    path = "/api/v1/recruiter/profile",
    request_body = RecruiterProfilePayload,
    responses(
        (status = 200, description = "Updated recruiter profile", body = RecruiterProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a recruiter", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "updateRecruiterProfile"
)]
#[put("/recruiter/profile")]
pub async fn update_recruiter_profile(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<RecruiterProfilePayload>,
) -> ApiResult<web::Json<RecruiterProfile>> {
    let actor = session.require_user_id()?;
    let payload = payload.into_inner();
    let profile = state
        .profiles
        .update_recruiter_profile(
            actor,
            RecruiterProfileUpdate {
                company_name: payload.company_name,
                website: payload.website,
                logo: payload.logo,
            },
        )
        .await?;
    Ok(web::Json(profile))
}
