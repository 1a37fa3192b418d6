//! # Gantry Session Storage - SQLite Backend
//!
//! SQLite implementation of the session store. Sessions survive server
//! restarts; expired sessions are evicted lazily on load.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use gantry_session::{SessionData, SessionError, SessionStore};

/// SQLite-backed session store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    ttl: Option<Duration>,
}

impl SqliteStore {
    /// Opens or creates the session database at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Database file location; the parent directory is created if
    ///   missing
    /// * `ttl` - Session lifetime; `None` keeps sessions until deleted
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the database
    /// cannot be opened, or the schema migration fails.
    pub async fn open(
        path: impl AsRef<Path>,
        ttl: Option<Duration>,
    ) -> Result<Self, SessionError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::Io(format!("failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", path.display());

        debug!(path = %path.display(), "Opening session database");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        let store = Self { pool, ttl };
        store.migrate().await?;

        info!(path = %path.display(), "SQLite session store ready");

        Ok(store)
    }

    /// Opens an in-memory database (for testing).
    pub async fn in_memory(ttl: Option<Duration>) -> Result<Self, SessionError> {
        // A pool with more than one connection would see independent
        // in-memory databases.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        let store = Self { pool, ttl };
        store.migrate().await?;
        Ok(store)
    }

    /// Runs database migrations.
    async fn migrate(&self) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id         TEXT PRIMARY KEY,
                data       TEXT NOT NULL,
                expires_at INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Connection(format!("migration failed: {e}")))?;

        Ok(())
    }

    /// Returns the current Unix timestamp.
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn expires_at(&self) -> Option<i64> {
        self.ttl.map(|ttl| Self::now() + ttl.as_secs() as i64)
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        let row = sqlx::query("SELECT data, expires_at FROM sessions WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: Option<i64> = row.get("expires_at");
        if expires_at.is_some_and(|at| at <= Self::now()) {
            self.delete(id).await?;
            debug!(session = %id, "evicted expired session");
            return Ok(None);
        }

        let data: String = row.get("data");
        let data = serde_json::from_str(&data)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        Ok(Some(data))
    }

    async fn save(&self, id: &str, data: &SessionData) -> Result<(), SessionError> {
        let payload = serde_json::to_string(data)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        sqlx::query("INSERT OR REPLACE INTO sessions (id, data, expires_at) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(payload)
            .bind(self.expires_at())
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        Ok(())
    }
}
