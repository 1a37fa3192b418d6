//! Session-cookie authentication.

use async_trait::async_trait;

use crate::identity::Identity;
use crate::outcome::StrategyResult;
use crate::request::AuthRequest;
use crate::strategy::AuthStrategy;

/// Strategy resolving the identity stored in the request's session.
///
/// Applies whenever a session is present, even an empty one. A session with a
/// `user_id` resolves to that user; a session without one resolves to the
/// anonymous identity. Both are successes; this strategy never fails.
pub struct SessionStrategy;

impl SessionStrategy {
    /// Name this strategy registers under.
    pub const NAME: &'static str = "session";
}

#[async_trait]
impl AuthStrategy for SessionStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid(&self, request: &AuthRequest) -> bool {
        request.session().is_some()
    }

    async fn authenticate(&self, request: &AuthRequest) -> StrategyResult {
        let identity = match request.session().and_then(|s| s.user_id()) {
            Some(user_id) => Identity::User(user_id),
            None => Identity::Anonymous,
        };

        StrategyResult::Success(identity)
    }
}
