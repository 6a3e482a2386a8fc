use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::session::SessionRecord;

use super::store::{SessionStore, session_key};

/// An in-process [`SessionStore`] that mimics Redis expiry.
///
/// Records are kept serialized, like the real store, and every call is
/// counted so tests can assert when the store was not consulted.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `put`, `get` and `delete` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    /// Makes every subsequent call fail as if the server were unreachable.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Redis(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "connection refused",
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, token: &str, record: &SessionRecord, ttl: Duration) -> Result<()> {
        self.enter()?;
        let json = sonic_rs::to_string(record)
            .map_err(|e| AppError::Serialization(e.to_string()))?;
        self.entries
            .lock()
            .await
            .insert(session_key(token), (json, Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>> {
        self.enter()?;
        let key = session_key(token);
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(&key) {
            None => return Ok(None),
            Some((_, expires_at)) => *expires_at <= Instant::now(),
        };
        if expired {
            entries.remove(&key);
            return Ok(None);
        }

        Ok(entries
            .get(&key)
            .and_then(|(json, _)| sonic_rs::from_str(json).ok()))
    }

    async fn delete(&self, token: &str) -> Result<()> {
        self.enter()?;
        self.entries.lock().await.remove(&session_key(token));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let store = MemorySessionStore::new();
        store
            .put("t1", &SessionRecord::user(7), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("t1").await.unwrap(), Some(SessionRecord::user(7)));
        assert_eq!(store.get("t2").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire() {
        let store = MemorySessionStore::new();
        store
            .put("t1", &SessionRecord::user(7), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(store.get("t1").await.unwrap(), None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemorySessionStore::new();
        store.delete("missing").await.unwrap();
        store
            .put("t1", &SessionRecord::user(1), Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("t1").await.unwrap();
        store.delete("t1").await.unwrap();
        assert_eq!(store.get("t1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = MemorySessionStore::new();
        let ttl = Duration::from_secs(60);
        store.put("t1", &SessionRecord::user(1), ttl).await.unwrap();
        store.put("t1", &SessionRecord::user(2), ttl).await.unwrap();
        assert_eq!(store.get("t1").await.unwrap(), Some(SessionRecord::user(2)));
    }
}
