//! Signup, login, and logout handlers.
//!
//! ```text
//! POST /api/v1/signup {"email":"ada@example.com","password1":"pw","password2":"pw","role":"employee"}
//! POST /api/v1/login  {"email":"ada@example.com","password":"pw"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::SignupRequest;
use crate::domain::{EmailAddress, Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /api/v1/signup`.
///
/// The two password fields must match, mirroring the signup form.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    /// Identity key for the new account.
    pub email: String,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Password.
    pub password1: String,
    /// Password confirmation.
    pub password2: String,
    /// Role chosen at signup.
    pub role: String,
}

impl TryFrom<SignupPayload> for SignupRequest {
    type Error = Error;

    fn try_from(payload: SignupPayload) -> Result<Self, Self::Error> {
        if payload.password1 != payload.password2 {
            return Err(Error::invalid_request("passwords do not match")
                .with_details(json!({ "field": "password2", "code": "password_mismatch" })));
        }
        let email = EmailAddress::new(&payload.email).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "email", "code": "invalid_email" }))
        })?;
        let role: Role = payload.role.parse().map_err(|_| {
            Error::invalid_request(format!("unknown role: {}", payload.role))
                .with_details(json!({ "field": "role", "code": "unknown_role" }))
        })?;
        Ok(Self {
            email,
            name: payload.name.filter(|name| !name.trim().is_empty()),
            password: payload.password1,
            role,
        })
    }
}

/// Create an account and establish a session for it.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<SignupPayload>,
) -> ApiResult<HttpResponse> {
    let request = SignupRequest::try_from(payload.into_inner())?;
    let user = state.accounts.sign_up(request).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<LoginPayload>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let email = EmailAddress::new(&payload.email).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" }))
    })?;
    let user = state.accounts.authenticate(&email, &payload.password).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Drop the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::User;
    use crate::domain::ports::MockAccountsService;
    use crate::inbound::http::test_utils::state_with_accounts;
    use actix_web::{App, test as actix_test, web};
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
            .service(web::scope("/api/v1").service(signup).service(login))
    }

    fn payload(password2: &str, role: &str) -> SignupPayload {
        SignupPayload {
            email: "ada@example.com".to_owned(),
            name: Some("Ada".to_owned()),
            password1: "secret".to_owned(),
            password2: password2.to_owned(),
            role: role.to_owned(),
        }
    }

    #[actix_web::test]
    async fn mismatched_passwords_are_a_validation_failure() {
        let mut accounts = MockAccountsService::new();
        accounts.expect_sign_up().times(0);
        let app = actix_test::init_service(test_app(state_with_accounts(accounts))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(payload("different", "employee"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error body");
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("passwords do not match")
        );
    }

    #[actix_web::test]
    async fn unknown_roles_are_rejected_before_the_service_runs() {
        let mut accounts = MockAccountsService::new();
        accounts.expect_sign_up().times(0);
        let app = actix_test::init_service(test_app(state_with_accounts(accounts))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(payload("secret", "manager"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn successful_signup_sets_the_session_cookie() {
        let mut accounts = MockAccountsService::new();
        accounts.expect_sign_up().times(1).return_once(|request| {
            Ok(User::new(request.email, request.name, request.role))
        });
        let app = actix_test::init_service(test_app(state_with_accounts(accounts))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(payload("secret", "recruiter"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("user body");
        assert_eq!(body.get("role").and_then(Value::as_str), Some("recruiter"));
    }

    #[actix_web::test]
    async fn failed_login_is_unauthorised() {
        let mut accounts = MockAccountsService::new();
        accounts
            .expect_authenticate()
            .times(1)
            .return_once(|_, _| Err(Error::unauthorized("invalid email or password")));
        let app = actix_test::init_service(test_app(state_with_accounts(accounts))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(LoginPayload {
                    email: "ada@example.com".to_owned(),
                    password: "wrong".to_owned(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
