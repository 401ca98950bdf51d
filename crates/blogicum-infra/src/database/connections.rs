use std::time::Duration;

#[cfg(feature = "postgres")]
use std::sync::Arc;

#[cfg(feature = "postgres")]
use blogicum_core::services::Repositories;
#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

#[cfg(feature = "postgres")]
use super::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

/// Pooled connection to the blog database.
///
/// # Example
/// ```ignore
/// let db = DatabaseConnections::init(&config).await?;
/// let blog = BlogService::new(db.repositories(), 10);
/// ```
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: DbConn,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the connection pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", config.max_connections);

        Ok(Self { main })
    }

    /// PostgreSQL-backed repositories sharing this pool.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(PostgresUserRepository::new(clone_conn(&self.main))),
            posts: Arc::new(PostgresPostRepository::new(clone_conn(&self.main))),
            comments: Arc::new(PostgresCommentRepository::new(clone_conn(&self.main))),
            categories: Arc::new(PostgresCategoryRepository::new(clone_conn(&self.main))),
            locations: Arc::new(PostgresLocationRepository::new(clone_conn(&self.main))),
        }
    }
}

/// Clone a connection handle. `DbConn` is only `Clone` when sea-orm's `mock`
/// feature is off (it is enabled for tests via this crate's `mock` feature), so clone the variants by hand.
#[cfg(feature = "postgres")]
fn clone_conn(conn: &DbConn) -> DbConn {
    match conn {
        DbConn::SqlxPostgresPoolConnection(c) => DbConn::SqlxPostgresPoolConnection(c.clone()),
        #[cfg(feature = "mock")]
        DbConn::MockDatabaseConnection(c) => DbConn::MockDatabaseConnection(c.clone()),
        DbConn::Disconnected => DbConn::Disconnected,
    }
}
