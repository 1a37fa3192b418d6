//! HTTP Basic authentication against the configured master account.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use base64::Engine;

use crate::config::MasterAccount;
use crate::error::AuthError;
use crate::identity::Identity;
use crate::outcome::{Challenge, StrategyResult};
use crate::request::AuthRequest;
use crate::strategy::AuthStrategy;

/// Failure reason for a credential mismatch, as shown to the client.
const WRONG_CREDENTIALS: &str = "wrong user and/or password";

struct MasterCredentials {
    user: String,
    /// Argon2id PHC string; the plaintext is hashed once at construction so
    /// the per-request comparison is constant time.
    password_hash: String,
}

/// Strategy verifying an `Authorization: Basic` header against the master
/// account.
///
/// Applies only when a master account is configured and the header parses as
/// Basic credentials; a missing or differently-shaped header falls through to
/// the next strategy. A success resolves to [`Identity::System`] and is never
/// persisted; every request re-authenticates.
pub struct BasicAuthStrategy {
    master: Option<MasterCredentials>,
    realm: String,
}

impl BasicAuthStrategy {
    /// Name this strategy registers under.
    pub const NAME: &'static str = "basic_auth";

    /// Default realm announced in the challenge header.
    pub const REALM: &'static str = "Gantry API";

    /// Creates the strategy from the configured master account.
    ///
    /// With `None` the strategy stays registered but is never valid for any
    /// request, so scopes listing it simply fall through.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] when the configured password
    /// cannot be hashed.
    pub fn new(master: Option<&MasterAccount>) -> Result<Self, AuthError> {
        let master = match master {
            Some(account) => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(account.password.as_bytes(), &salt)
                    .map_err(|e| {
                        AuthError::Configuration(format!("failed to hash master password: {e}"))
                    })?
                    .to_string();
                Some(MasterCredentials {
                    user: account.user.clone(),
                    password_hash: hash,
                })
            }
            None => None,
        };

        Ok(Self {
            master,
            realm: Self::REALM.to_string(),
        })
    }

    /// Overrides the challenge realm.
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    fn challenge(&self) -> Challenge {
        Challenge::basic(&self.realm)
    }
}

/// Parses an `Authorization: Basic <base64>` header into its credential pair.
///
/// Returns `None` for other schemes, undecodable base64, non-UTF-8 payloads,
/// and payloads without a `:` separator.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, payload) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

#[async_trait]
impl AuthStrategy for BasicAuthStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid(&self, request: &AuthRequest) -> bool {
        self.master.is_some()
            && request
                .authorization()
                .and_then(parse_basic)
                .is_some()
    }

    async fn authenticate(&self, request: &AuthRequest) -> StrategyResult {
        let Some(master) = &self.master else {
            return StrategyResult::failure("no master account configured");
        };

        let Some((user, password)) = request.authorization().and_then(parse_basic) else {
            return StrategyResult::Failure {
                reason: WRONG_CREDENTIALS.to_string(),
                challenge: Some(self.challenge()),
            };
        };

        let parsed_hash = match PasswordHash::new(&master.password_hash) {
            Ok(hash) => hash,
            Err(e) => {
                return StrategyResult::failure(format!("invalid master password hash: {e}"));
            }
        };

        let password_matches = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        if user == master.user && password_matches {
            StrategyResult::Success(Identity::System)
        } else {
            StrategyResult::Failure {
                reason: WRONG_CREDENTIALS.to_string(),
                challenge: Some(self.challenge()),
            }
        }
    }

    fn store(&self) -> bool {
        false
    }
}
