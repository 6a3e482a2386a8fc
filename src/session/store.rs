use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::session::SessionRecord;

/// Key-value storage for session records with store-enforced expiry.
///
/// Every operation is expected to be atomic on its own; nothing here
/// assumes transactions across calls.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `record` under `token`, replacing any previous entry, and
    /// expires it after `ttl`.
    async fn put(&self, token: &str, record: &SessionRecord, ttl: Duration) -> Result<()>;

    /// Returns the record for `token`, or `None` when the token is unknown
    /// or its entry has expired.
    async fn get(&self, token: &str) -> Result<Option<SessionRecord>>;

    /// Removes the entry for `token`. Unknown tokens are not an error.
    async fn delete(&self, token: &str) -> Result<()>;
}

/// The storage key a token lives under.
pub(crate) fn session_key(token: &str) -> String {
    format!("session:{}", token)
}
