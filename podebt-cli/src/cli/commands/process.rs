//! `process` command - run the full pipeline over uploaded workbooks

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use uuid::Uuid;

use crate::api::{StorageClient, WarehouseClient, report_object_path, warehouse_rows};
use crate::config::{AppConfig, STORAGE_TOKEN_VAR, WAREHOUSE_TOKEN_VAR, env_token};
use crate::report::areas::{AreaDirectory, UNASSIGNED_AREA};
use crate::report::excel::{read_orders_workbook, read_rate_workbook, write_report};
use crate::report::pipeline::{self, DebtReport};
use crate::report::progress::Reporter;
use crate::report::rates::RateTable;

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Purchase-order workbook (xlsx)
    #[arg(long)]
    pub orders: PathBuf,

    /// Rate workbook; omitted means rates come from the warehouse
    #[arg(long)]
    pub rates: Option<PathBuf>,

    /// Report output path; defaults to debt_report_<date>.xlsx
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip the warehouse append and the object-storage upload
    #[arg(long)]
    pub no_upload: bool,
}

/// Run the command, streaming progress events to stdout as JSON lines
pub async fn run(args: ProcessArgs, config: AppConfig) -> Result<()> {
    let (reporter, mut rx) = Reporter::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(line) = serde_json::to_string(&event) {
                println!("{}", line);
            }
        }
    });

    let result = execute(&args, &config, &reporter).await;
    if let Err(err) = &result {
        reporter.error(format!("{:#}", err));
    }
    drop(reporter);
    let _ = printer.await;
    result
}

async fn execute(args: &ProcessArgs, config: &AppConfig, progress: &Reporter) -> Result<()> {
    let run_id = Uuid::new_v4();
    let run_at = Utc::now();
    log::info!("processing run {}", run_id);

    progress.step("Reading order workbook", 5);
    let parsed = read_orders_workbook(&args.orders)?;
    progress.step(format!("Orders read: {} rows", parsed.orders.len()), 15);

    progress.step("Loading exchange rates", 20);
    let rates = load_rates(args, config).await?;
    progress.step(format!("Rates loaded: {} dates", rates.len()), 25);

    progress.step("Fetching area directory", 30);
    let http = reqwest::Client::new();
    let areas = match &config.areas {
        Some(area_config) => AreaDirectory::fetch(&http, &area_config.csv_url).await?,
        None => {
            log::warn!(
                "no area directory configured, every area will be {}",
                UNASSIGNED_AREA
            );
            AreaDirectory::empty()
        }
    };

    progress.step("Filtering closed orders", 40);
    let open = pipeline::filter_closed(parsed.orders);

    progress.step("Annotating fiscal year and area", 50);
    let mut rows = pipeline::enrich(open, &areas);

    progress.step("Converting amounts to USD", 60);
    pipeline::convert_to_usd(&mut rows, &rates);

    progress.step("Computing real debt", 70);
    pipeline::compute_real_debt(&mut rows);
    let report = DebtReport { rows, rates };

    progress.step("Writing report workbook", 75);
    let file_name = format!("debt_report_{}.xlsx", run_at.format("%Y-%m-%d"));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&file_name));
    write_report(&report, &output)?;

    let mut url = None;
    if args.no_upload {
        log::info!("uploads skipped (--no-upload)");
    } else {
        if let Some(warehouse) = &config.warehouse {
            progress.step("Appending rows to warehouse", 85);
            let mapped = warehouse_rows(&report.rows, run_id, run_at);
            WarehouseClient::new(warehouse.clone(), env_token(WAREHOUSE_TOKEN_VAR))
                .append_rows(&mapped)
                .await?;
        } else {
            log::warn!("warehouse not configured, append skipped");
        }

        if let Some(storage) = &config.storage {
            progress.step("Uploading report to object storage", 92);
            let bytes = std::fs::read(&output).with_context(|| {
                format!("failed to read report for upload: {}", output.display())
            })?;
            let object_path = report_object_path(run_at, &file_name);
            let public = StorageClient::new(storage.clone(), env_token(STORAGE_TOKEN_VAR))
                .upload_report(&object_path, bytes)
                .await?;
            url = Some(public);
        } else {
            log::warn!("object storage not configured, upload skipped");
        }
    }

    progress.complete(
        report.total_rows(),
        report.flagged_count(),
        output.display().to_string(),
        url,
    );
    Ok(())
}

/// Rates come from the uploaded workbook when given, the warehouse otherwise
async fn load_rates(args: &ProcessArgs, config: &AppConfig) -> Result<RateTable> {
    match &args.rates {
        Some(path) => read_rate_workbook(path),
        None => {
            let warehouse = config
                .warehouse
                .as_ref()
                .context("no rate workbook given and no warehouse configured")?;
            WarehouseClient::new(warehouse.clone(), env_token(WAREHOUSE_TOKEN_VAR))
                .fetch_rate_table()
                .await
        }
    }
}
