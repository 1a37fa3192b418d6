//! Scope-to-strategy registry.
//!
//! Registration happens once at process startup through the builder;
//! the built registry is immutable and safe to share across requests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AuthError;
use crate::strategy::AuthStrategy;

/// Per-scope chain policy.
#[derive(Debug, Clone, Default)]
pub struct ScopePolicy {
    /// Ordered strategy names; list order is the trial order.
    pub strategies: Vec<String>,
    /// Whether identities resolved in this scope may be persisted.
    pub store: bool,
}

/// Builder for [`StrategyRegistry`]. Registration is append-only; validation
/// happens in [`build`](Self::build).
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    strategies: HashMap<String, Arc<dyn AuthStrategy>>,
    scopes: HashMap<String, ScopePolicy>,
    duplicates: Vec<String>,
}

impl StrategyRegistryBuilder {
    /// Registers a strategy under its own name.
    pub fn strategy(mut self, strategy: Arc<dyn AuthStrategy>) -> Self {
        let name = strategy.name().to_string();
        if self.strategies.insert(name.clone(), strategy).is_some() {
            self.duplicates.push(name);
        }
        self
    }

    /// Appends a strategy name to a scope's trial order.
    pub fn register(mut self, scope: &str, strategy_name: &str) -> Self {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .strategies
            .push(strategy_name.to_string());
        self
    }

    /// Sets a scope's persistence policy.
    pub fn scope_store(mut self, scope: &str, store: bool) -> Self {
        self.scopes.entry(scope.to_string()).or_default().store = store;
        self
    }

    /// Validates the registrations and produces an immutable registry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateStrategy`] when two strategies share a
    /// name, and [`AuthError::UnknownStrategy`] when a scope references a
    /// name that was never registered. Both abort process initialization;
    /// they can never surface during request handling.
    pub fn build(self) -> Result<StrategyRegistry, AuthError> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(AuthError::DuplicateStrategy(name));
        }

        for policy in self.scopes.values() {
            for name in &policy.strategies {
                if !self.strategies.contains_key(name) {
                    return Err(AuthError::UnknownStrategy(name.clone()));
                }
            }
        }

        Ok(StrategyRegistry {
            strategies: self.strategies,
            scopes: self.scopes,
        })
    }
}

/// Immutable mapping from strategy names to strategies and from scope names
/// to chain policies.
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn AuthStrategy>>,
    scopes: HashMap<String, ScopePolicy>,
}

impl StrategyRegistry {
    /// Starts a new builder.
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::default()
    }

    /// The chain policy for a scope, if the scope is registered.
    pub fn policy(&self, scope: &str) -> Option<&ScopePolicy> {
        self.scopes.get(scope)
    }

    /// Looks up a strategy by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn AuthStrategy>> {
        self.strategies.get(name).cloned()
    }

    /// Whether a strategy with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }
}
