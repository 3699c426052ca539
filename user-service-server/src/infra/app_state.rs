use std::{fmt, sync::Arc};

use tokio_util::sync::CancellationToken;
use user_service_core::UserRepository;

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub repository: UserRepository,
    pub config: Arc<Config>,
    /// Cancelled once when the process begins shutting down. Every request
    /// derives its own token from this one.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        repository: UserRepository,
        config: Arc<Config>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            repository,
            config,
            shutdown,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("repository", &self.repository)
            .field("shutdown_requested", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}
