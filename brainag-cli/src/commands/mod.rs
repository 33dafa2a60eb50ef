//! Subcommand implementations

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;

use brainag_server::db::{create_pool_with_options, DEFAULT_MAX_CONNECTIONS};

pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

/// Connection options shared by every database-backed command
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    pub async fn connect(&self) -> Result<PgPool> {
        let url = self.database_url.as_deref().context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.brainag/.env",
        )?;

        create_pool_with_options(url, self.max_connections)
            .await
            .context("Failed to connect to database")
    }
}

/// Apply pending migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    brainag_server::MIGRATOR
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations up to date");
    Ok(())
}
