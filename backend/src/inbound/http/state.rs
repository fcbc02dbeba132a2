//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsService, AdminDirectory, ApplicationsService, JobsService, ProfilesService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Signup and authentication use-cases.
    pub accounts: Arc<dyn AccountsService>,
    /// Profile reads and updates.
    pub profiles: Arc<dyn ProfilesService>,
    /// Job posting and discovery.
    pub jobs: Arc<dyn JobsService>,
    /// Application lifecycle.
    pub applications: Arc<dyn ApplicationsService>,
    /// Superadmin directory.
    pub admin: Arc<dyn AdminDirectory>,
}

impl HttpState {
    /// Bundle the port implementations handlers depend on.
    pub fn new(
        accounts: Arc<dyn AccountsService>,
        profiles: Arc<dyn ProfilesService>,
        jobs: Arc<dyn JobsService>,
        applications: Arc<dyn ApplicationsService>,
        admin: Arc<dyn AdminDirectory>,
    ) -> Self {
        Self {
            accounts,
            profiles,
            jobs,
            applications,
            admin,
        }
    }
}
