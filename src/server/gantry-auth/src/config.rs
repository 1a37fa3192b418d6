//! Authentication configuration.
//!
//! Read once at startup and immutable afterwards; there is no ambient global
//! lookup. The manager is constructed from this via
//! [`AuthManager::from_config`](crate::AuthManager::from_config).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::strategies::{BasicAuthStrategy, SessionStrategy};

/// Scope name of the v3 API.
pub const SCOPE_API_V3: &str = "api_v3";

/// Scope name of the interactive web UI.
pub const SCOPE_WEB: &str = "web";

/// How a scope answers an exhausted chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Terminal 401 carrying any challenge headers (API callers).
    #[default]
    Challenge,
    /// 302 redirect to the failure page (interactive, redirect-capable
    /// callers).
    Redirect,
}

/// Master account credential pair for the Basic-Auth strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterAccount {
    /// Master account username.
    pub user: String,
    /// Master account password. Hashed at startup; never compared in plain.
    pub password: String,
}

/// Per-scope chain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Ordered strategy names; list order is the trial order.
    pub strategies: Vec<String>,
    /// Whether identities resolved in this scope may be persisted.
    #[serde(default)]
    pub store: bool,
    /// Failure rendering for this scope.
    #[serde(default)]
    pub on_failure: FailureMode,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Strategy order used for scopes with no explicit configuration.
    #[serde(default = "default_strategy_names")]
    pub default_strategies: Vec<String>,

    /// Persistence policy for scopes with no explicit configuration.
    #[serde(default)]
    pub default_store: bool,

    /// Per-scope chain configuration.
    #[serde(default = "default_scopes")]
    pub scopes: HashMap<String, ScopeConfig>,

    /// Master account for HTTP Basic authentication. Without it the
    /// Basic-Auth strategy never applies.
    #[serde(default)]
    pub master_account: Option<MasterAccount>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_strategies: default_strategy_names(),
            default_store: false,
            scopes: default_scopes(),
            master_account: None,
        }
    }
}

impl AuthConfig {
    /// The configuration for a scope, if explicitly configured.
    pub fn scope(&self, name: &str) -> Option<&ScopeConfig> {
        self.scopes.get(name)
    }

    /// The failure rendering for a scope; unconfigured scopes challenge.
    pub fn failure_mode(&self, scope: &str) -> FailureMode {
        self.scope(scope)
            .map(|s| s.on_failure)
            .unwrap_or_default()
    }
}

fn default_strategy_names() -> Vec<String> {
    vec![
        BasicAuthStrategy::NAME.to_string(),
        SessionStrategy::NAME.to_string(),
    ]
}

fn default_scopes() -> HashMap<String, ScopeConfig> {
    let mut scopes = HashMap::new();
    scopes.insert(
        SCOPE_API_V3.to_string(),
        ScopeConfig {
            strategies: default_strategy_names(),
            store: false,
            on_failure: FailureMode::Challenge,
        },
    );
    scopes.insert(
        SCOPE_WEB.to_string(),
        ScopeConfig {
            strategies: vec![SessionStrategy::NAME.to_string()],
            store: true,
            on_failure: FailureMode::Redirect,
        },
    );
    scopes
}
