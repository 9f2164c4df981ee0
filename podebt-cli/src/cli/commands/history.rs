//! `history` command - list previously uploaded reports

use anyhow::{Context, Result};
use clap::Args;

use crate::api::StorageClient;
use crate::config::{AppConfig, STORAGE_TOKEN_VAR, env_token};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Maximum runs to list
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

pub async fn run(args: HistoryArgs, config: AppConfig) -> Result<()> {
    let storage = config
        .storage
        .context("object storage is not configured")?;
    let client = StorageClient::new(storage, env_token(STORAGE_TOKEN_VAR));

    let runs = client.list_reports(args.limit).await?;
    if runs.is_empty() {
        println!("no stored reports");
        return Ok(());
    }

    for run in runs {
        println!("{}", run.run);
        for file in run.files {
            println!("  {} ({} bytes)", file.name, file.size);
            println!("    {}", file.url);
        }
    }
    Ok(())
}
