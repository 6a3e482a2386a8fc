use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::state::AppState;

/// Where unauthenticated visitors of protected pages are sent.
pub const LOGIN_PATH: &str = "/login";

/// Which paths need a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoutes {
    /// Paths protected only when matched exactly.
    exact: Vec<String>,
    /// Prefixes protecting every longer path that starts with them. The prefix itself is not.
    prefixes: Vec<String>,
}

impl Default for ProtectedRoutes {
    fn default() -> Self {
        Self::new(["/admin", "/profile"], ["/movies"])
    }
}

impl ProtectedRoutes {
    pub fn new<E, P>(exact: E, prefixes: P) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            exact: exact.into_iter().map(Into::into).collect(),
            prefixes: prefixes
                .into_iter()
                .map(|prefix| {
                    let prefix: String = prefix.into();
                    prefix.trim_end_matches('/').to_string()
                })
                .collect(),
        }
    }

    /// Whether a request for `path` must carry a session.
    ///
    /// The path is canonicalized first, the way the static file service
    /// resolves it. Paths that cannot be canonicalized are treated as
    /// protected.
    pub fn requires_session(&self, path: &str) -> bool {
        let Some(path) = canonical_path(path) else {
            return true;
        };

        let bare = match path.trim_end_matches('/') {
            "" => "/",
            bare => bare,
        };
        if self.exact.iter().any(|exact| exact == bare) {
            return true;
        }

        self.prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()) && path != *prefix)
    }
}

/// Percent-decodes `path`, collapses repeated slashes and drops `.` segments.
///
/// Returns `None` for paths that do not decode to UTF-8 or that contain `..`.
/// A trailing slash is kept.
fn canonical_path(path: &str) -> Option<String> {
    let decoded = urlencoding::decode(path).ok()?;

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            segment => segments.push(segment),
        }
    }

    let mut canonical = format!("/{}", segments.join("/"));
    if !segments.is_empty() && (decoded.ends_with('/') || decoded.ends_with("/.")) {
        canonical.push('/');
    }
    Some(canonical)
}

/// A middleware that keeps unauthenticated requests away from protected paths.
///
/// Public paths pass through without touching the session store. Protected
/// paths with no live session are redirected to [`LOGIN_PATH`]; with a live
/// session the record is placed in the request extensions. If the session
/// cannot be resolved at all the request fails with a server error instead
/// of being let through.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn guard_routes(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if !state.protected_routes.requires_session(&path) {
        return next.run(request).await;
    }

    tracing::debug!("🔐 Checking session for protected path {}", path);

    match state.sessions.resolve_current_session(&cookies).await {
        Ok(Some(session)) => {
            tracing::debug!("✅ Session found for user: {}", session.id);
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!("❌ No session for {}, redirecting to {}", path, LOGIN_PATH);
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        Err(e) => {
            tracing::error!("❌ Session lookup failed for {}: {}", path, e);
            e.into_response()
        }
    }
}
