//! Cross-request carrier for data that must survive exactly one redirect.
//!
//! Entries written while handling request N are stored under the visitor's
//! flash session and taken (read + deleted) when request N+1 starts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::Cache;
use crate::config::CACHE_PREFIX_FLASH;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Carried-over key/value entries of one flash session.
pub type FlashEntries = HashMap<String, Value>;

/// Flash store trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FlashStore: Send + Sync {
    /// Remove and return everything stored for the session.
    async fn take(&self, session_id: &str) -> AppResult<FlashEntries>;

    /// Merge entries into the session and restart its TTL. An entry replaces
    /// a stored value under the same key; other stored keys are kept, so a
    /// concurrent request of the same visitor never erases them. Empty
    /// entries leave the session untouched.
    async fn put(&self, session_id: &str, entries: &FlashEntries, ttl_seconds: u64)
        -> AppResult<()>;
}

/// Flash store backed by Redis.
pub struct RedisFlashStore {
    cache: Cache,
}

impl RedisFlashStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    fn key(session_id: &str) -> String {
        format!("{}{}", CACHE_PREFIX_FLASH, session_id)
    }
}

#[async_trait]
impl FlashStore for RedisFlashStore {
    async fn take(&self, session_id: &str) -> AppResult<FlashEntries> {
        self.cache.take_fields(&Self::key(session_id)).await
    }

    async fn put(
        &self,
        session_id: &str,
        entries: &FlashEntries,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        self.cache
            .set_fields_with_ttl(&Self::key(session_id), entries, ttl_seconds)
            .await
    }
}

/// Flash store kept in process memory, for single-instance deployments and
/// tests. Expired sessions are swept on every write.
#[derive(Default)]
pub struct MemoryFlashStore {
    sessions: Mutex<HashMap<String, (Instant, FlashEntries)>>,
}

impl MemoryFlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently holding entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, (expires_at, _)| *expires_at > now);
        sessions.len()
    }
}

#[async_trait]
impl FlashStore for MemoryFlashStore {
    async fn take(&self, session_id: &str) -> AppResult<FlashEntries> {
        let mut sessions = self.sessions.lock().await;
        match sessions.remove(session_id) {
            Some((expires_at, entries)) if expires_at > Instant::now() => Ok(entries),
            Some(_) => {
                tracing::debug!(session = %session_id, "Dropped expired flash entries");
                Ok(FlashEntries::new())
            }
            None => Ok(FlashEntries::new()),
        }
    }

    async fn put(
        &self,
        session_id: &str,
        entries: &FlashEntries,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, (expires_at, _)| *expires_at > now);
        if sessions.len() < before {
            tracing::debug!(evicted = before - sessions.len(), "Evicted expired flash sessions");
        }

        let expires_at = now + Duration::from_secs(ttl_seconds);
        let (slot_expiry, stored) = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| (expires_at, FlashEntries::new()));
        *slot_expiry = expires_at;
        stored.extend(entries.iter().map(|(key, value)| (key.clone(), value.clone())));
        Ok(())
    }
}
