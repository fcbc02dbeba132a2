//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test::{self, TestRequest};
use actix_web::{HttpResponse, web};

use crate::domain::ports::{
    MockAccountsService, MockAdminDirectory, MockApplicationsService, MockJobsService,
    MockProfilesService,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Backdoor login route for handler tests.
///
/// Register on the app under test so `authed_request` can mint a session
/// cookie signed with that app's key.
pub(crate) fn test_login_resource() -> actix_web::Resource {
    web::resource("/__test/login/{id}").route(web::get().to(
        |session: SessionContext, path: web::Path<String>| async move {
            let id: UserId = path
                .parse()
                .map_err(|_| Error::invalid_request("bad test user id"))?;
            session.persist_user(id)?;
            Ok::<_, Error>(HttpResponse::Ok().finish())
        },
    ))
}

/// Build a request carrying a session cookie for `actor`.
pub(crate) async fn authed_request<S, B, E>(
    app: &S,
    actor: UserId,
    req: TestRequest,
) -> actix_http::Request
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = E>,
    B: actix_web::body::MessageBody,
    E: std::fmt::Debug,
{
    let login = test::call_service(
        app,
        TestRequest::get()
            .uri(&format!("/__test/login/{actor}"))
            .to_request(),
    )
    .await;
    let cookie = login
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie issued")
        .into_owned();
    req.cookie(cookie).to_request()
}

pub(crate) fn state_with_accounts(accounts: MockAccountsService) -> HttpState {
    HttpState::new(
        Arc::new(accounts),
        Arc::new(MockProfilesService::new()),
        Arc::new(MockJobsService::new()),
        Arc::new(MockApplicationsService::new()),
        Arc::new(MockAdminDirectory::new()),
    )
}

pub(crate) fn state_with_profiles(profiles: MockProfilesService) -> HttpState {
    HttpState::new(
        Arc::new(MockAccountsService::new()),
        Arc::new(profiles),
        Arc::new(MockJobsService::new()),
        Arc::new(MockApplicationsService::new()),
        Arc::new(MockAdminDirectory::new()),
    )
}

pub(crate) fn state_with_jobs(jobs: MockJobsService) -> HttpState {
    HttpState::new(
        Arc::new(MockAccountsService::new()),
        Arc::new(MockProfilesService::new()),
        Arc::new(jobs),
        Arc::new(MockApplicationsService::new()),
        Arc::new(MockAdminDirectory::new()),
    )
}

pub(crate) fn state_with_applications(applications: MockApplicationsService) -> HttpState {
    HttpState::new(
        Arc::new(MockAccountsService::new()),
        Arc::new(MockProfilesService::new()),
        Arc::new(MockJobsService::new()),
        Arc::new(applications),
        Arc::new(MockAdminDirectory::new()),
    )
}

pub(crate) fn state_with_admin(admin: MockAdminDirectory) -> HttpState {
    HttpState::new(
        Arc::new(MockAccountsService::new()),
        Arc::new(MockProfilesService::new()),
        Arc::new(MockJobsService::new()),
        Arc::new(MockApplicationsService::new()),
        Arc::new(admin),
    )
}
