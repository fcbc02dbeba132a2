//! Superadmin directory handlers.
//!
//! ```text
//! GET    /api/v1/admin/users?page=1
//! POST   /api/v1/admin/users
//! PUT    /api/v1/admin/users/{id}
//! DELETE /api/v1/admin/users/{id}
//! GET    /api/v1/admin/employees[/{id}]
//! GET    /api/v1/admin/recruiters[/{id}]
//! ```
//!
//! Authorisation lives in the admin service, not here: every handler just
//! forwards the acting user id.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{ProvisionUserRequest, UserAccountUpdate};
use crate::domain::{
    EmailAddress, EmployeeId, EmployeeProfile, Error, JOBS_PAGE_SIZE, RecruiterId,
    RecruiterProfile, Role, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PageQuery, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for administrative account provisioning.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionUserPayload {
    /// Identity key for the new account.
    pub email: String,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Initial password.
    pub password: String,
    /// Role to provision with.
    pub role: String,
}

/// Body for administrative account updates.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdatePayload {
    /// New role.
    pub role: String,
    /// Whether the account may authenticate.
    pub is_active: bool,
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!("unknown role: {raw}"))
            .with_details(json!({ "field": "role", "code": "unknown_role" }))
    })
}

/// List accounts.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Accounts", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let actor = session.require_user_id()?;
    let page = query.into_inner().resolve(JOBS_PAGE_SIZE);
    let users = state.admin.list_users(actor, page).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Provision an account with any role.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = ProvisionUserPayload,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminProvisionUser"
)]
#[post("/admin/users")]
pub async fn provision_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<ProvisionUserPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let payload = payload.into_inner();
    let email = EmailAddress::new(&payload.email).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" }))
    })?;
    let role = parse_role(&payload.role)?;
    let user = state
        .admin
        .provision_user(
            actor,
            ProvisionUserRequest {
                email,
                name: payload.name,
                password: payload.password,
                role,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Update an account's role and active flag.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    request_body = UserUpdatePayload,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateUser"
)]
#[put("/admin/users/{id}")]
pub async fn update_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
    payload: web::Json<UserUpdatePayload>,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = session.require_user_id()?;
    let payload = payload.into_inner();
    let role = parse_role(&payload.role)?;
    let user = state
        .admin
        .update_user(
            actor,
            path.into_inner(),
            UserAccountUpdate {
                role,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Delete an account, cascading to profiles and applications.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.admin.delete_user(actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List employee profiles.
#[utoipa::path(
    get,
    path = "/api/v1/admin/employees",
    params(PageQuery),
    responses(
        (status = 200, description = "Employee profiles", body = [EmployeeProfile]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListEmployees"
)]
#[get("/admin/employees")]
pub async fn list_employees(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<EmployeeProfile>>> {
    let actor = session.require_user_id()?;
    let page = query.into_inner().resolve(JOBS_PAGE_SIZE);
    Ok(web::Json(state.admin.list_employees(actor, page).await?))
}

/// Fetch one employee profile.
#[utoipa::path(
    get,
    path = "/api/v1/admin/employees/{id}",
    responses(
        (status = 200, description = "Employee profile", body = EmployeeProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error),
        (status = 404, description = "No such profile", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminEmployeeDetail"
)]
#[get("/admin/employees/{id}")]
pub async fn employee_detail(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<EmployeeId>,
) -> ApiResult<web::Json<EmployeeProfile>> {
    let actor = session.require_user_id()?;
    Ok(web::Json(
        state.admin.employee_detail(actor, path.into_inner()).await?,
    ))
}

/// List recruiter profiles.
#[utoipa::path(
    get,
    path = "/api/v1/admin/recruiters",
    params(PageQuery),
    responses(
        (status = 200, description = "Recruiter profiles", body = [RecruiterProfile]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListRecruiters"
)]
#[get("/admin/recruiters")]
pub async fn list_recruiters(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<RecruiterProfile>>> {
    let actor = session.require_user_id()?;
    let page = query.into_inner().resolve(JOBS_PAGE_SIZE);
    Ok(web::Json(state.admin.list_recruiters(actor, page).await?))
}

/// Fetch one recruiter profile.
#[utoipa::path(
    get,
    path = "/api/v1/admin/recruiters/{id}",
    responses(
        (status = 200, description = "Recruiter profile", body = RecruiterProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a superadmin", body = Error),
        (status = 404, description = "No such profile", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminRecruiterDetail"
)]
#[get("/admin/recruiters/{id}")]
pub async fn recruiter_detail(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<RecruiterId>,
) -> ApiResult<web::Json<RecruiterProfile>> {
    let actor = session.require_user_id()?;
    Ok(web::Json(
        state
            .admin
            .recruiter_detail(actor, path.into_inner())
            .await?,
    ))
}
