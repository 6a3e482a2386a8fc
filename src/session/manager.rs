use std::sync::Arc;
use std::time::Duration;

use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::{self, OffsetDateTime};
use tower_cookies::{Cookie, Cookies};

use crate::crypto::token::{self, generate_session_token};
use crate::error::{AppError, Result};
use crate::models::session::SessionRecord;

use super::store::SessionStore;

/// The name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Creates, resolves and destroys sessions.
///
/// All operations take the request's cookie jar explicitly. Within one
/// request the jar is stable, so resolving twice gives the same answer.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionManager {
    /// Creates a new `SessionManager`.
    ///
    /// # Arguments
    ///
    /// * `store` - Where session records live.
    /// * `ttl` - Lifetime of a session, applied to both the store entry and the cookie.
    /// * `secure_cookie` - Whether the cookie is restricted to HTTPS.
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration, secure_cookie: bool) -> Self {
        Self {
            store,
            ttl,
            secure_cookie,
        }
    }

    /// Starts a session for `record` and points the client's cookie at it.
    ///
    /// The store write happens first, so a cookie is never issued for a
    /// session that was not stored. A lifetime the cookie cannot express is
    /// rejected before anything is stored.
    pub async fn create_session(&self, cookies: &Cookies, record: &SessionRecord) -> Result<()> {
        let expires = self.cookie_expiry()?;
        let session_token = generate_session_token();

        self.store.put(&session_token, record, self.ttl).await?;
        tracing::info!(
            "✅ Session created for user {} ({}…)",
            record.id,
            token::redact(&session_token)
        );

        cookies.add(self.session_cookie(session_token, expires));
        Ok(())
    }

    /// Returns the session the request's cookie points at, if any.
    ///
    /// A missing or malformed cookie answers `None` without consulting the
    /// store. Store failures are returned as errors, never as a session.
    pub async fn resolve_current_session(&self, cookies: &Cookies) -> Result<Option<SessionRecord>> {
        let Some(session_token) = current_token(cookies) else {
            return Ok(None);
        };

        if !token::is_well_formed(&session_token) {
            tracing::debug!("Ignoring malformed session cookie");
            return Ok(None);
        }

        let session = self.store.get(&session_token).await?;
        if session.is_none() {
            tracing::debug!(
                "No live session for {}…",
                token::redact(&session_token)
            );
        }
        Ok(session)
    }

    /// Ends the request's session, if it has one, and clears the cookie.
    ///
    /// The cookie is cleared even when the store call fails; the failure is
    /// still reported.
    pub async fn destroy_current_session(&self, cookies: &Cookies) -> Result<()> {
        let Some(session_token) = current_token(cookies) else {
            return Ok(());
        };

        let deleted = if token::is_well_formed(&session_token) {
            self.store.delete(&session_token).await
        } else {
            Ok(())
        };

        cookies.remove(removal_cookie());
        tracing::info!("✅ Session destroyed ({}…)", token::redact(&session_token));

        deleted
    }

    fn cookie_expiry(&self) -> Result<OffsetDateTime> {
        time::Duration::try_from(self.ttl)
            .ok()
            .and_then(|ttl| OffsetDateTime::now_utc().checked_add(ttl))
            .ok_or_else(|| AppError::Internal(format!("Session lifetime {:?} is out of range", self.ttl)))
    }

    fn session_cookie(&self, value: String, expires: OffsetDateTime) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, value);
        cookie.set_http_only(true);
        cookie.set_secure(self.secure_cookie);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_expires(expires);
        cookie
    }
}

fn current_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie
}
