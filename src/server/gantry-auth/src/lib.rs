//! # Gantry Auth
//!
//! Pluggable authentication chain for the Gantry API.
//!
//! Authentication is organized around named *scopes* (for example `api_v3`):
//! each scope maps to an ordered list of strategies which are tried in turn
//! until one succeeds or the chain is exhausted.
//!
//! ## Built-in strategies
//!
//! - HTTP Basic against a configured master account
//! - Session cookie (resolves to the stored user, or anonymous)
//!
//! New strategies implement [`AuthStrategy`] and are registered into the
//! [`StrategyRegistry`] by name; the manager depends only on the trait.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod identity;
pub mod manager;
pub mod outcome;
pub mod registry;
pub mod request;
pub mod strategies;
pub mod strategy;

pub use config::{AuthConfig, FailureMode, MasterAccount, ScopeConfig};
pub use error::AuthError;
pub use identity::Identity;
pub use manager::AuthManager;
pub use outcome::{AuthOutcome, ChainFailure, Challenge, FailedAttempt, StrategyResult};
pub use registry::{ScopePolicy, StrategyRegistry, StrategyRegistryBuilder};
pub use request::{AuthRequest, RequestContext};
pub use strategy::AuthStrategy;
