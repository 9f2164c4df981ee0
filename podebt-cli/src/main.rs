mod api;
mod cli;
mod config;
mod report;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Process(args) => cli::commands::process::run(args, config).await,
        Commands::Check(args) => cli::commands::check::run(args),
        Commands::History(args) => cli::commands::history::run(args, config).await,
    }
}
