//! # Gantry API
//!
//! HTTP surface of the authentication subsystem.
//!
//! Contains the adapter translating inbound requests into the manager's
//! input contract, the per-scope authentication middleware, the failure
//! endpoint rendering exhausted chains as 401 or redirect responses, and the
//! built-in routes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod failure;
pub mod middleware;
pub mod routes;
pub mod state;

pub use adapter::{build_auth_request, session_cookie, SESSION_COOKIE};
pub use failure::{CallerClass, FailureEndpoint};
pub use middleware::{require_auth, ScopedAuth};
pub use routes::router;
pub use state::AppState;
