//! Authentication manager.
//!
//! Orchestrates strategy execution for a scope on one request: ordered trial,
//! first success wins, failures recorded but non-terminal.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::outcome::{AuthOutcome, ChainFailure, StrategyResult};
use crate::registry::{ScopePolicy, StrategyRegistry};
use crate::request::{AuthRequest, RequestContext};
use crate::strategies::{BasicAuthStrategy, SessionStrategy};

/// Runs a scope's strategy chain against inbound requests.
///
/// Holds only read-only state (the registry and the fallback policy) and may
/// be shared freely across concurrent requests.
pub struct AuthManager {
    registry: StrategyRegistry,
    defaults: ScopePolicy,
}

impl AuthManager {
    /// Creates a manager over a built registry.
    ///
    /// `defaults` is the chain policy applied to scopes the registry does not
    /// know.
    pub fn new(registry: StrategyRegistry, defaults: ScopePolicy) -> Self {
        Self { registry, defaults }
    }

    /// Wires the built-in strategies and scope table from configuration.
    ///
    /// # Errors
    ///
    /// Fails when a configured scope or the default list references an
    /// unregistered strategy, or when the master credentials cannot be
    /// prepared. Both abort startup.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let mut builder = StrategyRegistry::builder()
            .strategy(Arc::new(BasicAuthStrategy::new(
                config.master_account.as_ref(),
            )?))
            .strategy(Arc::new(SessionStrategy));

        for (scope, scope_config) in &config.scopes {
            builder = builder.scope_store(scope, scope_config.store);
            for name in &scope_config.strategies {
                builder = builder.register(scope, name);
            }
        }

        let registry = builder.build()?;

        for name in &config.default_strategies {
            if !registry.contains(name) {
                return Err(AuthError::UnknownStrategy(name.clone()));
            }
        }

        Ok(Self::new(
            registry,
            ScopePolicy {
                strategies: config.default_strategies.clone(),
                store: config.default_store,
            },
        ))
    }

    /// The underlying registry.
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Runs the chain for `scope` against one request.
    ///
    /// Strategies are tried in the scope's configured order. A strategy whose
    /// `valid` check rejects the request shape is skipped; the first success
    /// resolves the context identity and ends the chain; a failure is
    /// recorded and the chain continues. When every strategy was inapplicable
    /// or failed, the aggregated failure is returned.
    pub async fn authenticate(
        &self,
        scope: &str,
        request: &AuthRequest,
        context: &mut RequestContext,
    ) -> AuthOutcome {
        let policy = self.registry.policy(scope).unwrap_or(&self.defaults);
        let mut failure = ChainFailure::new(scope);

        for name in &policy.strategies {
            let Some(strategy) = self.registry.get(name) else {
                // Registered scopes are validated at build time; this can
                // only trip for hand-assembled default lists.
                debug!(scope = %scope, strategy = %name, "strategy not registered, skipping");
                continue;
            };

            if !strategy.valid(request) {
                debug!(scope = %scope, strategy = %name, "strategy not applicable, skipping");
                continue;
            }

            match strategy.authenticate(request).await {
                StrategyResult::Success(identity) => {
                    let persist = policy.store && strategy.store();
                    context.resolve(identity);
                    debug!(
                        scope = %scope,
                        strategy = %name,
                        identity = ?identity,
                        persist,
                        "authentication succeeded"
                    );
                    return AuthOutcome::Success { identity, persist };
                }
                StrategyResult::Failure { reason, challenge } => {
                    debug!(scope = %scope, strategy = %name, reason = %reason, "strategy failed");
                    failure.record(strategy.name(), reason, challenge);
                }
            }
        }

        warn!(
            scope = %scope,
            attempts = failure.attempts().len(),
            reason = %failure.reason(),
            "authentication chain exhausted"
        );
        AuthOutcome::Failure(failure)
    }
}
