//! Server assembly: adapters, services, session middleware, and routes.

pub mod config;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::SameSite;
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{AccountService, AdminService, ApplicationService, JobService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admin, applications, auth, health, jobs, profiles};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselApplicationRepository, DieselEmployeeRepository, DieselJobRepository,
    DieselRecruiterRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use crate::outbound::{
    ApalisNotificationQueue, Argon2PasswordHasher, NotificationQueueBackend,
    StubNotificationQueue,
};

pub use config::{ConfigError, ServerConfig};

fn io_error(message: String) -> std::io::Error {
    std::io::Error::other(message)
}

/// Wire the Diesel adapters and domain services into the handler state.
fn build_state(pool: DbPool, queue: NotificationQueueBackend) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let employees = Arc::new(DieselEmployeeRepository::new(pool.clone()));
    let recruiters = Arc::new(DieselRecruiterRepository::new(pool.clone()));
    let jobs_repo = Arc::new(DieselJobRepository::new(pool.clone()));
    let applications_repo = Arc::new(DieselApplicationRepository::new(pool));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let queue = Arc::new(queue);

    let accounts = AccountService::new(
        Arc::clone(&users),
        Arc::clone(&employees),
        Arc::clone(&recruiters),
        hasher,
        Arc::clone(&queue),
    );
    let admin = AdminService::new(
        Arc::clone(&users),
        Arc::clone(&employees),
        Arc::clone(&recruiters),
        accounts.clone(),
    );
    let jobs = JobService::new(
        Arc::clone(&jobs_repo),
        Arc::clone(&recruiters),
        Arc::clone(&employees),
        Arc::clone(&applications_repo),
        Arc::clone(&users),
    );
    let applications = ApplicationService::new(
        applications_repo,
        jobs_repo,
        employees,
        recruiters,
        users,
        queue,
    );

    let accounts = Arc::new(accounts);
    HttpState::new(
        accounts.clone(),
        accounts,
        Arc::new(jobs),
        Arc::new(applications),
        Arc::new(admin),
    )
}

/// Run database migrations, build the adapter stack, and serve until
/// shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    run_pending_migrations(&config.database_url).map_err(|err| io_error(err.to_string()))?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| io_error(err.to_string()))?;

    let queue = if config.notifications_stub {
        NotificationQueueBackend::Stub(StubNotificationQueue::new())
    } else {
        NotificationQueueBackend::Apalis(
            ApalisNotificationQueue::connect(&config.database_url)
                .await
                .map_err(|err| io_error(err.to_string()))?,
        )
    };

    let state = web::Data::new(build_state(pool, queue));
    let health_state = web::Data::new(health::HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let prometheus = PrometheusMetricsBuilder::new("jobboard")
        .endpoint("/metrics")
        .build()
        .map_err(|err| io_error(err.to_string()))?;

    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        // Register /jobs/search ahead of /jobs/{id} so the literal segment
        // wins the route match.
        let api = web::scope("/api/v1")
            .wrap(session)
            .service(auth::signup)
            .service(auth::login)
            .service(auth::logout)
            .service(profiles::employee_profile)
            .service(profiles::update_employee_profile)
            .service(profiles::recruiter_profile)
            .service(profiles::update_recruiter_profile)
            .service(jobs::search_jobs)
            .service(jobs::list_jobs)
            .service(applications::apply_for_job)
            .service(jobs::job_detail)
            .service(jobs::create_job)
            .service(jobs::update_job)
            .service(jobs::delete_job)
            .service(applications::list_applications)
            .service(applications::application_detail)
            .service(applications::update_application_status)
            .service(admin::list_users)
            .service(admin::provision_user)
            .service(admin::update_user)
            .service(admin::delete_user)
            .service(admin::list_employees)
            .service(admin::employee_detail)
            .service(admin::list_recruiters)
            .service(admin::recruiter_detail);

        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(state.clone())
            .wrap(Trace)
            .service(api)
            .service(health::ready)
            .service(health::live);

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}")
                .url("/api-docs/openapi.json", crate::doc::ApiDoc::openapi()),
        );

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "server listening");
    server.run().await
}
