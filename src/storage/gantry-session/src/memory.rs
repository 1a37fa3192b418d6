//! In-memory session backend.
//!
//! Used in development mode; sessions do not survive a server restart.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SessionError;
use crate::store::{SessionData, SessionStore};

struct Entry {
    data: SessionData,
    touched_at: Instant,
}

/// In-memory session store with optional idle expiry.
///
/// Expired entries are evicted lazily on load.
pub struct MemoryStore {
    ttl: Option<Duration>,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    ///
    /// * `ttl` - Idle lifetime of a session; `None` keeps sessions until the
    ///   process exits.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn expired(&self, entry: &Entry) -> bool {
        match self.ttl {
            Some(ttl) => entry.touched_at.elapsed() >= ttl,
            None => false,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        {
            let entries = self.entries.read().await;
            match entries.get(id) {
                Some(entry) if !self.expired(entry) => return Ok(Some(entry.data.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry exists but has expired; evict it.
        let mut entries = self.entries.write().await;
        if entries.get(id).is_some_and(|entry| self.expired(entry)) {
            entries.remove(id);
            debug!(session = %id, "evicted expired session");
        }
        Ok(None)
    }

    async fn save(&self, id: &str, data: &SessionData) -> Result<(), SessionError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            id.to_string(),
            Entry {
                data: data.clone(),
                touched_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().await;
        entries.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new(None);
        let mut data = SessionData::new();
        data.set_user_id(42);

        store.save("sid-1", &data).await.unwrap();
        let loaded = store.load("sid-1").await.unwrap().unwrap();
        assert_eq!(loaded.user_id(), Some(42));
    }

    #[tokio::test]
    async fn test_missing_session() {
        let store = MemoryStore::new(None);
        assert!(store.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new(None);
        store.save("sid-1", &SessionData::new()).await.unwrap();
        store.delete("sid-1").await.unwrap();
        assert!(store.load("sid-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_payload() {
        let store = MemoryStore::new(None);
        let mut data = SessionData::new();
        data.set_user_id(1);
        store.save("sid-1", &data).await.unwrap();

        data.set_user_id(2);
        store.save("sid-1", &data).await.unwrap();

        let loaded = store.load("sid-1").await.unwrap().unwrap();
        assert_eq!(loaded.user_id(), Some(2));
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let store = MemoryStore::new(Some(Duration::from_millis(10)));
        store.save("sid-1", &SessionData::new()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(store.load("sid-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_ttl_keeps_sessions() {
        let store = MemoryStore::new(None);
        store.save("sid-1", &SessionData::new()).await.unwrap();
        assert!(store.load("sid-1").await.unwrap().is_some());
    }
}
