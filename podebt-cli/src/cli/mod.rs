//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "podebt-cli",
    version,
    about = "Purchase-order debt reporting pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process order and rate workbooks into an enriched debt report
    Process(commands::process::ProcessArgs),
    /// Validate a purchase-order workbook's columns
    Check(commands::check::CheckArgs),
    /// List previously uploaded reports, newest first
    History(commands::history::HistoryArgs),
}
