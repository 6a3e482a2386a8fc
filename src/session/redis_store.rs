use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::crypto::token;
use crate::error::{AppError, Result};
use crate::models::session::SessionRecord;

use super::store::{SessionStore, session_key};

/// A [`SessionStore`] backed by Redis `SET EX` / `GET` / `DEL`.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    /// Wraps an established Redis connection manager.
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, token: &str, record: &SessionRecord, ttl: Duration) -> Result<()> {
        let session_json = sonic_rs::to_string(record)
            .map_err(|e| AppError::Serialization(format!("Session serialization failed: {}", e)))?;

        let mut redis = self.redis.clone();
        let _: () = redis
            .set_ex(session_key(token), &session_json, ttl.as_secs().max(1))
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis set_ex failed: {}", e);
                AppError::Redis(e)
            })?;

        tracing::debug!("✅ Session saved to Redis: session:{}…", token::redact(token));
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>> {
        let mut redis = self.redis.clone();
        let session_json: Option<String> = redis.get(session_key(token)).await?;

        let Some(session_json) = session_json else {
            return Ok(None);
        };

        match sonic_rs::from_str::<SessionRecord>(&session_json) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!("❌ Invalid session JSON for session:{}…: {}", token::redact(token), e);
                Ok(None)
            }
        }
    }

    async fn delete(&self, token: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(session_key(token)).await?;
        Ok(())
    }
}
