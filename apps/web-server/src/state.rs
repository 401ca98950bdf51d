//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::domain::{Category, Location};
use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_core::services::{AccountService, BlogService, Repositories};
use blogicum_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService};

use crate::config::{AppConfig, SessionConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<dyn TokenService>,
    pub session: SessionConfig,
}

impl AppState {
    /// Build the application state, preferring PostgreSQL when configured.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = match connect(config).await {
            Some(repos) => repos,
            None => seeded_memory_store().await,
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        tracing::info!("Application state initialized");
        Self::from_parts(
            repos,
            tokens,
            passwords,
            config.posts_per_page,
            config.session.clone(),
        )
    }

    /// Assemble the state from already-built ports.
    pub fn from_parts(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        posts_per_page: u64,
        session: SessionConfig,
    ) -> Self {
        let accounts = AccountService::new(repos.users.clone(), passwords);
        Self {
            blog: Arc::new(BlogService::new(repos, posts_per_page)),
            accounts: Arc::new(accounts),
            tokens,
            session,
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect(config: &AppConfig) -> Option<Repositories> {
    use blogicum_infra::DatabaseConnections;
    use migration::{Migrator, MigratorTrait};

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return None;
    };

    let connections = match DatabaseConnections::init(db_config).await {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return None;
        }
    };

    if config.run_migrations {
        if let Err(e) = Migrator::up(&connections.main, None).await {
            tracing::error!("Migrations failed: {}. Using in-memory fallback.", e);
            return None;
        }
        tracing::info!("Database migrations applied");
    }

    Some(connections.repositories())
}

#[cfg(not(feature = "postgres"))]
async fn connect(_config: &AppConfig) -> Option<Repositories> {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    None
}

/// In-memory store with the reference data a fresh blog needs.
async fn seeded_memory_store() -> Repositories {
    let db = InMemoryDatabase::new();
    db.put(Category::new("General", "general").with_description("Posts about everything"))
        .await;
    db.put(Location::new("Planet Earth")).await;
    db.repositories()
}
