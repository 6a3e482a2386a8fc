use redis::aio::ConnectionManager;
use std::sync::Arc;
use crate::config::Config;
use crate::error::Result;
use crate::middleware_layer::auth::ProtectedRoutes;
use crate::repositories::user::{PgUserRepository, UserRepository};
use crate::session::{RedisSessionStore, SessionManager};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The user store.
    pub users: Arc<dyn UserRepository>,
    /// Session lifecycle over the session store and the cookie jar.
    pub sessions: SessionManager,
    /// Paths that require a session.
    pub protected_routes: Arc<ProtectedRoutes>,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState` connected to PostgreSQL and Redis.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        crate::db::run_migrations(&db).await?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = ConnectionManager::new(redis_client).await?;
        tracing::info!("✅ Redis Connection Manager initialized");

        let sessions = SessionManager::new(
            Arc::new(RedisSessionStore::new(redis)),
            config.session_ttl(),
            config.cookie_secure,
        );

        Ok(Self::from_parts(
            Arc::new(PgUserRepository::new(db)),
            sessions,
            config.clone(),
        ))
    }

    /// Assembles a state from already-built collaborators.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        sessions: SessionManager,
        config: Config,
    ) -> Self {
        AppState {
            users,
            sessions,
            protected_routes: Arc::new(ProtectedRoutes::default()),
            config,
        }
    }
}
