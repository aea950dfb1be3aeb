//! Apartment turnover ETL - fetch, clean, join and write one SQLite database

use anyhow::Result;
use housing_turnover::cli::{parse_args, Command, USAGE};
use housing_turnover::{run_pipeline, Config};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let db_path = match parse_args(env::args().skip(1)) {
        Ok(Command::Run { db_path }) => db_path,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    info!("Starting apartment turnover pipeline");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: years {}-{}",
        config.years.first(),
        config.years.last()
    );

    let summary = run_pipeline(&config, &db_path).await?;
    info!("✓ Pipeline complete: {}", summary);

    Ok(())
}
