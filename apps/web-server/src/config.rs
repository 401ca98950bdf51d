//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use blogicum_core::domain::DEFAULT_PER_PAGE;
use blogicum_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending schema migrations at startup.
    pub run_migrations: bool,
    pub posts_per_page: u64,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
}

/// Session cookie settings.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Send the cookie over HTTPS only.
    pub secure: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_var("DB_MIN_CONNECTIONS", 2),
            connect_timeout: Duration::from_secs(parse_var("DB_CONNECT_TIMEOUT_SECS", 10)),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database,
            run_migrations: flag_var("RUN_MIGRATIONS", true),
            posts_per_page: parse_var("POSTS_PER_PAGE", DEFAULT_PER_PAGE),
            jwt: JwtConfig::from_env(),
            session: SessionConfig {
                secure: flag_var("SESSION_COOKIE_SECURE", false),
            },
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn flag_var(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}
