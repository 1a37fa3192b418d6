//! Shared application state.

use std::sync::Arc;

use gantry_auth::{AuthConfig, AuthManager};
use gantry_session::SessionStore;

use crate::failure::FailureEndpoint;

/// State shared by the authentication middleware and routes.
///
/// Everything in here is read-only after startup and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The authentication manager.
    pub manager: Arc<AuthManager>,
    /// Session store collaborator.
    pub sessions: Arc<dyn SessionStore>,
    /// Failure endpoint used when a chain is exhausted.
    pub failure: Arc<FailureEndpoint>,
    /// Authentication configuration (failure modes per scope).
    pub config: Arc<AuthConfig>,
}

impl AppState {
    /// Assembles the state with the default failure endpoint.
    pub fn new(
        manager: Arc<AuthManager>,
        sessions: Arc<dyn SessionStore>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            manager,
            sessions,
            failure: Arc::new(FailureEndpoint::default()),
            config,
        }
    }
}
