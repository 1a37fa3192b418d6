//! Authentication strategy trait.

use async_trait::async_trait;

use crate::outcome::StrategyResult;
use crate::request::AuthRequest;

/// Trait for credential-verification strategies.
///
/// Implementations are stateless per invocation and shared across requests;
/// any configuration they carry is read-only after registration.
///
/// The manager first asks `valid` whether the request even carries the shape
/// of credentials this strategy understands, and only then calls
/// `authenticate`. A strategy that is not valid for a request is skipped
/// silently; a failed `authenticate` is recorded but does not stop the chain.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Unique name this strategy is registered under.
    fn name(&self) -> &'static str;

    /// Whether this strategy applies to the request's credential shape.
    fn valid(&self, request: &AuthRequest) -> bool;

    /// Verifies the credentials.
    ///
    /// Only called when [`valid`](Self::valid) returned true.
    async fn authenticate(&self, request: &AuthRequest) -> StrategyResult;

    /// Whether a success from this strategy may be persisted in the session.
    ///
    /// Effective persistence also requires the scope's store policy.
    fn store(&self) -> bool {
        true
    }
}
