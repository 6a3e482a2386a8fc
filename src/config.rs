use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Context, Result};

/// Seconds in one day.
const SECONDS_PER_DAY: u64 = 86_400;

/// The longest session `SESSION_DURATION_DAYS` may ask for.
pub const MAX_SESSION_DURATION_DAYS: u64 = 365;

/// Token-bucket settings for the signup and login routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthRateLimit {
    /// The number of requests a single peer may burst.
    pub burst: u32,
    /// The interval after which one request slot is replenished.
    pub replenish_secs: u64,
}

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The duration of a session in days.
    pub session_duration_days: u64,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// The directory the UI bundle is served from.
    pub static_dir: PathBuf,
    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_allowed_origins: Vec<String>,
    /// Throttling for the credential endpoints. `None` disables it.
    pub auth_rate_limit: Option<AuthRateLimit>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/reelnote".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            session_duration_days: 7,
            cookie_secure: true,
            static_dir: PathBuf::from("public"),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            auth_rate_limit: Some(AuthRateLimit {
                burst: 10,
                replenish_secs: 2,
            }),
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// Only `DATABASE_URL` is mandatory; everything else falls back to
    /// the values of [`Config::default`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(addr) => addr.parse().context("Invalid BIND_ADDR")?,
            Err(_) => defaults.bind_addr,
        };

        let cors_allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.cors_allowed_origins,
        };

        let burst: u32 = env::var("AUTH_RATE_LIMIT_BURST")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("Invalid AUTH_RATE_LIMIT_BURST")?;
        let replenish_secs: u64 = env::var("AUTH_RATE_LIMIT_REPLENISH_SECS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .context("Invalid AUTH_RATE_LIMIT_REPLENISH_SECS")?;
        let auth_rate_limit = (burst > 0).then_some(AuthRateLimit {
            burst,
            replenish_secs: replenish_secs.max(1),
        });

        let session_duration_days = parse_session_duration_days(
            env::var("SESSION_DURATION_DAYS").ok().as_deref(),
            defaults.session_duration_days,
        )
        .context("Invalid SESSION_DURATION_DAYS")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            bind_addr,
            session_duration_days,
            cookie_secure: parse_bool(
                env::var("COOKIE_SECURE").ok().as_deref(),
                defaults.cookie_secure,
            )
            .context("Invalid COOKIE_SECURE")?,
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            cors_allowed_origins,
            auth_rate_limit,
        })
    }

    /// How long a session lives, both in the store and in the cookie.
    ///
    /// Values beyond [`MAX_SESSION_DURATION_DAYS`] are clamped to it.
    pub fn session_ttl(&self) -> Duration {
        let days = self.session_duration_days.min(MAX_SESSION_DURATION_DAYS);
        Duration::from_secs(days.checked_mul(SECONDS_PER_DAY).unwrap_or(u64::MAX))
    }
}

fn parse_session_duration_days(value: Option<&str>, default: u64) -> Result<u64> {
    let days = match value {
        None => return Ok(default),
        Some(v) => v.trim().parse::<u64>()?,
    };
    match days {
        0 => anyhow::bail!("must be at least 1 day"),
        days if days > MAX_SESSION_DURATION_DAYS => {
            anyhow::bail!("must be at most {} days, got {}", MAX_SESSION_DURATION_DAYS, days)
        }
        days => Ok(days),
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v == "true" || v == "1" || v == "yes" => Ok(true),
        Some(v) if v == "false" || v == "0" || v == "no" => Ok(false),
        Some(v) => anyhow::bail!("expected a boolean, got {:?}", v),
    }
}
