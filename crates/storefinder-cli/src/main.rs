mod db;
mod nearby;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "storefinder-cli")]
#[command(about = "Nearest-store lookup command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find the stores serving a postal code
    Nearby {
        /// Brazilian postal code (CEP), with or without the hyphen
        postal_code: String,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Store catalog database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("storefinder-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Nearby { postal_code, json } => {
            nearby::run_nearby(&config, &postal_code, json).await?;
        }
        Commands::Db { command } => db::run_db(&config, command).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
