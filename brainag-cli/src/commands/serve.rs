//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use brainag_server::db::PgStore;
use brainag_server::http::{run_server, AppState, ServerConfig};

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Migrate, then serve until Ctrl+C or SIGTERM.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = args.db.connect().await?;
    super::migrate(&pool).await?;

    tracing::info!("Starting brainag server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    run_server(AppState::new(PgStore::new(pool)), config)
        .await
        .context("Server error")
}
