//! Resolved principal types.

use serde::{Deserialize, Serialize};

/// The principal resolved by a successful authentication.
///
/// This is an opaque reference: `User` carries only the user id found in the
/// credential material, resolving it to an actual user record is the job of
/// downstream authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Identity {
    /// A known user, referenced by id.
    User(u64),
    /// The privileged master-account principal (Basic-Auth success).
    System,
    /// The anonymous principal. A valid identity, not a failure; whether
    /// anonymous access is permitted is decided by authorization later.
    Anonymous,
}

impl Identity {
    /// Whether this is the anonymous principal.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    /// Whether this is the privileged system principal.
    pub fn is_system(&self) -> bool {
        matches!(self, Identity::System)
    }

    /// Returns the user id for `User` identities.
    pub fn user_id(&self) -> Option<u64> {
        match self {
            Identity::User(id) => Some(*id),
            _ => None,
        }
    }
}
