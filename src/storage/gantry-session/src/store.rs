//! Session store trait and payload type.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Identifier of one session, as carried in the session cookie.
pub type SessionId = String;

/// Well-known session key holding the authenticated user id.
pub const USER_ID_KEY: &str = "user_id";

/// Payload of one session: a flat string-keyed map of JSON values.
///
/// A session may exist without a user id; such a session belongs to an
/// anonymous visitor. Typed accessors are provided for the well-known keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionData {
    values: HashMap<String, serde_json::Value>,
}

impl SessionData {
    /// Creates an empty session payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the authenticated user id, if one is stored.
    pub fn user_id(&self) -> Option<u64> {
        self.values.get(USER_ID_KEY).and_then(|v| v.as_u64())
    }

    /// Stores the authenticated user id.
    pub fn set_user_id(&mut self, user_id: u64) {
        self.values
            .insert(USER_ID_KEY.to_string(), serde_json::Value::from(user_id));
    }

    /// Removes the authenticated user id, keeping the rest of the session.
    pub fn clear_user_id(&mut self) {
        self.values.remove(USER_ID_KEY);
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Stores `value` under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    /// Whether the session holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Session store trait for implementing different session backends.
///
/// Stores are keyed by [`SessionId`]; concurrent requests for different
/// sessions never contend on the same key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the session with the given id, if present and not expired.
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError>;

    /// Saves the session payload under the given id, replacing any previous
    /// payload.
    async fn save(&self, id: &str, data: &SessionData) -> Result<(), SessionError>;

    /// Deletes the session with the given id.
    async fn delete(&self, id: &str) -> Result<(), SessionError>;
}
