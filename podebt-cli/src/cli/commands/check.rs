//! `check` command - validate a workbook's columns without processing it

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;

use crate::report::excel::inspect_headers;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Purchase-order workbook to validate
    pub workbook: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let report = inspect_headers(&args.workbook)?;

    println!("header row: {}", report.header_row + 1);
    if report.is_valid() {
        println!("all expected columns present");
    } else {
        println!("missing columns: {}", report.missing.join(", "));
    }
    if !report.extra.is_empty() {
        println!("extra columns: {}", report.extra.join(", "));
    }

    if !report.is_valid() {
        bail!("workbook is missing expected columns");
    }
    Ok(())
}
