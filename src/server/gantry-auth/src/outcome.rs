//! Outcome types produced by strategies and the manager.

use crate::identity::Identity;

/// Reported reason when the chain ends without any strategy applying.
pub const NO_APPLICABLE_STRATEGY: &str = "no applicable strategy";

/// A response header a failing strategy asks to be set on the eventual 401,
/// instructing the client how to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    value: String,
}

impl Challenge {
    /// Header name challenges are emitted under.
    pub const HEADER: &'static str = "WWW-Authenticate";

    /// Creates a challenge with a raw header value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The `Basic` challenge for the given realm.
    pub fn basic(realm: &str) -> Self {
        Self::new(format!("Basic realm=\"{realm}\""))
    }

    /// The header value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Result of one strategy's `authenticate` call.
#[derive(Debug, Clone)]
pub enum StrategyResult {
    /// The strategy verified the credentials and resolved an identity.
    Success(Identity),
    /// The credentials were present but wrong.
    Failure {
        /// Human-readable reason, surfaced to the failure endpoint.
        reason: String,
        /// Challenge header to set on the eventual 401 response.
        challenge: Option<Challenge>,
    },
}

impl StrategyResult {
    /// Shorthand for a failure without a challenge.
    pub fn failure(reason: impl Into<String>) -> Self {
        StrategyResult::Failure {
            reason: reason.into(),
            challenge: None,
        }
    }
}

/// One failed attempt recorded while walking the chain.
#[derive(Debug, Clone)]
pub struct FailedAttempt {
    /// Name of the strategy that failed.
    pub strategy: &'static str,
    /// The strategy's failure reason.
    pub reason: String,
}

/// Aggregate failure produced when a scope's chain is exhausted.
///
/// Every failed attempt is kept, in trial order, for debuggability; the
/// reported reason is the last one encountered.
#[derive(Debug, Clone)]
pub struct ChainFailure {
    scope: String,
    attempts: Vec<FailedAttempt>,
    challenges: Vec<Challenge>,
}

impl ChainFailure {
    /// Creates an empty failure for the given scope.
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            attempts: Vec::new(),
            challenges: Vec::new(),
        }
    }

    /// Records one strategy failure.
    pub fn record(
        &mut self,
        strategy: &'static str,
        reason: impl Into<String>,
        challenge: Option<Challenge>,
    ) {
        self.attempts.push(FailedAttempt {
            strategy,
            reason: reason.into(),
        });
        if let Some(challenge) = challenge {
            self.challenges.push(challenge);
        }
    }

    /// The scope whose chain failed.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// All failed attempts, in trial order.
    pub fn attempts(&self) -> &[FailedAttempt] {
        &self.attempts
    }

    /// Challenge headers collected from failing strategies.
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    /// The reported reason: the last failure, or a generic message when no
    /// strategy was applicable at all.
    pub fn reason(&self) -> &str {
        self.attempts
            .last()
            .map(|a| a.reason.as_str())
            .unwrap_or(NO_APPLICABLE_STRATEGY)
    }

    /// Name of the strategy whose failure is reported, if any failed.
    pub fn offending_strategy(&self) -> Option<&'static str> {
        self.attempts.last().map(|a| a.strategy)
    }
}

/// The result of running a scope's strategy chain against one request.
///
/// Exactly one of the variants holds per invocation.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// A strategy succeeded.
    Success {
        /// The resolved principal.
        identity: Identity,
        /// Whether the identity may be cached in the session store. True only
        /// when both the scope's store policy and the strategy agree.
        persist: bool,
    },
    /// Every strategy was inapplicable or failed.
    Failure(ChainFailure),
}

impl AuthOutcome {
    /// Whether this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }
}
