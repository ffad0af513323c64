pub mod backend;
pub mod instrumented;
pub mod memory;
pub mod schema;

#[cfg(feature = "postgres")]
pub mod postgres;

use anyhow::Result;
use std::sync::Arc;

#[cfg(feature = "postgres")]
pub use postgres::PostgresUserRepository;

pub use backend::UserRepository;
pub use instrumented::InstrumentedUserRepository;
pub use memory::MemoryUserRepository;

/// Returned by repositories when a lookup matches no row
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record not found")]
pub struct RecordNotFound;

/// Shared repository handle - polymorphic over backends
pub type Users = Arc<dyn UserRepository>;

/// Pick the user store based on configuration
pub async fn init_repository(config: &crate::config::DatabaseConfig) -> Result<Users> {
    if !config.enabled {
        tracing::info!("Database disabled, using in-memory user store");
        return Ok(Arc::new(MemoryUserRepository::with_demo_user()));
    }

    connect(config).await
}

#[cfg(feature = "postgres")]
async fn connect(config: &crate::config::DatabaseConfig) -> Result<Users> {
    tracing::info!("Initializing PostgreSQL backend");
    let pool = postgres::connection::create_pool(config).await?;
    postgres::connection::test_connection(&pool).await?;
    schema::run_migrations(&pool, config.migrations_folder.as_deref()).await?;

    let backend: Users = Arc::new(PostgresUserRepository::new(pool));
    Ok(Arc::new(InstrumentedUserRepository::new(backend)))
}

#[cfg(not(feature = "postgres"))]
async fn connect(_config: &crate::config::DatabaseConfig) -> Result<Users> {
    anyhow::bail!("DATABASE_ENABLED is set but this build has no database support (enable the `postgres` feature)")
}
