use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;
mod error;
mod state;
mod db;
mod session;
mod crypto {
    pub mod password;
    pub mod token;
}

mod models {
    pub mod user;
    pub mod session;
}

mod repositories {
    pub mod user;
    #[cfg(test)]
    pub mod user_mock;
}

mod services {
    pub mod auth;
}

mod handlers {
    pub mod auth;
}

mod middleware_layer {
    pub mod auth;
}

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    let app = app::build_router(state);

    tracing::info!("🚀 Server listening on http://{}", config.bind_addr);
    if !config.cookie_secure {
        tracing::warn!("⚠️ Session cookies are not marked Secure");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
