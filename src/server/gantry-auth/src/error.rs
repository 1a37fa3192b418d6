//! Authentication error types.
//!
//! Only startup-time misconfiguration surfaces as an error; everything a
//! strategy can get wrong at request time is expressed as an
//! [`AuthOutcome`](crate::AuthOutcome) instead.

use thiserror::Error;

/// Errors that can occur while assembling the authentication chain.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A scope or default list references a strategy that was never
    /// registered.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Two strategies were registered under the same name.
    #[error("duplicate strategy: {0}")]
    DuplicateStrategy(String),

    /// Invalid credential configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
