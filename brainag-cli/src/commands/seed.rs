//! Load demo data

use anyhow::{Context, Result};
use clap::Parser;

use brainag_server::db::PgStore;
use brainag_server::seed;

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Truncate every table before seeding
    #[arg(long)]
    pub reset: bool,
}

pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let pool = args.db.connect().await?;
    super::migrate(&pool).await?;

    if args.reset {
        seed::reset(&pool).await.context("Failed to truncate tables")?;
    }

    let report = seed::seed(&PgStore::new(pool))
        .await
        .context("Failed to seed database")?;

    println!(
        "Seeded {} producers, {} farms, {} harvests, {} crops",
        report.producers, report.farms, report.harvests, report.crops
    );
    Ok(())
}
