use anyhow::Context;
use clap::{Parser, Subcommand};

use bizsim_db::logging::{self, LogFormat};
use bizsim_db::services::{
    default_routines, ensure_schema, initialize_player_accounting, player_balances, run_seeds,
};
use bizsim_db::{Config, PoolManager};

#[derive(Parser, Debug)]
#[command(
    name = "bizsim-db",
    about = "Schema, seed data and ledger setup for the business simulation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or upgrade every table, column and index
    Schema,
    /// Insert static game content that is not present yet
    Seed,
    /// Schema followed by seed
    Setup,
    /// Give a player the standard chart of accounts and opening balances
    InitPlayer {
        #[arg(long)]
        player_id: i64,
    },
    /// Print a player's account balances as JSON
    Balances {
        #[arg(long)]
        player_id: i64,
    },
    /// Connect, then print pool statistics as JSON
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    logging::init(&config.log_level, LogFormat::parse(&config.log_format)).ok();

    let db = PoolManager::connect(config.pool_settings()?)
        .await
        .context("Failed to connect to database")?;

    let result = run(&db, cli.command).await;
    db.shutdown().await;
    result
}

async fn run(db: &PoolManager, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Schema => {
            ensure_schema(db).await?;
        }
        Command::Seed => {
            let report = run_seeds(db, &default_routines()).await?;
            tracing::info!(
                inserted = report.total_inserted(),
                skipped = report.skipped(),
                "Seeding complete"
            );
        }
        Command::Setup => {
            ensure_schema(db).await?;
            let report = run_seeds(db, &default_routines()).await?;
            tracing::info!(
                inserted = report.total_inserted(),
                skipped = report.skipped(),
                "Setup complete"
            );
        }
        Command::InitPlayer { player_id } => {
            let created = initialize_player_accounting(db, player_id).await?;
            println!("{}", serde_json::json!({ "player_id": player_id, "created": created }));
        }
        Command::Balances { player_id } => {
            let balances = player_balances(db, player_id).await?;
            println!("{}", serde_json::to_string_pretty(&balances)?);
        }
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&db.stats())?);
        }
    }

    Ok(())
}
