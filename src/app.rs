use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_cookies::CookieManagerLayer;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Builds the application router.
///
/// Every request, including those served from the static directory, passes
/// through the route guard.
pub fn build_router(state: AppState) -> Router {
    let mut credential_routes: Router<AppState> = Router::new()
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login));

    if let Some(limit) = state.config.auth_rate_limit {
        match GovernorConfigBuilder::default()
            .per_second(limit.replenish_secs)
            .burst_size(limit.burst)
            .use_headers()
            .finish()
        {
            Some(governor_conf) => {
                credential_routes =
                    credential_routes.layer(GovernorLayer::new(Arc::new(governor_conf)));
            }
            None => tracing::warn!("⚠️ Invalid auth rate limit {:?}, throttling disabled", limit),
        }
    }

    let session_routes: Router<AppState> = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::current_session));

    let cors = cors_layer(&state.config.cors_allowed_origins);
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(credential_routes)
        .merge(session_routes)
        .fallback_service(static_files)
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::guard_routes,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}
