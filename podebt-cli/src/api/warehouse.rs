//! Warehouse table client
//!
//! Appends enriched rows to the configured table and fetches the rate
//! table when no rate workbook is uploaded. Plain JSON over reqwest; no
//! retry beyond what the client provides natively.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::WarehouseConfig;
use crate::report::rates::RateTable;
use crate::report::types::EnrichedOrder;

/// One enriched row in warehouse column layout
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseRow {
    #[serde(rename = "po_debt_order_no")]
    pub order_no: Option<String>,
    #[serde(rename = "po_debt_vendor")]
    pub vendor: Option<String>,
    #[serde(rename = "po_debt_branch")]
    pub branch: Option<String>,
    #[serde(rename = "po_debt_currency")]
    pub currency: Option<String>,
    #[serde(rename = "po_debt_price_override")]
    pub price_override: Option<f64>,
    #[serde(rename = "po_debt_amount")]
    pub amount: Option<f64>,
    #[serde(rename = "po_debt_amount_received")]
    pub amount_received: Option<f64>,
    #[serde(rename = "po_debt_amount_linked")]
    pub amount_linked: Option<f64>,
    #[serde(rename = "po_debt_order_date")]
    pub order_date: Option<NaiveDate>,
    #[serde(rename = "po_debt_unit_of_measure")]
    pub unit_of_measure: Option<String>,
    #[serde(rename = "po_debt_description")]
    pub description: Option<String>,
    #[serde(rename = "po_debt_charge_account")]
    pub charge_account: Option<String>,
    #[serde(rename = "po_debt_requester")]
    pub requester: Option<String>,
    #[serde(rename = "po_debt_closure_status")]
    pub closure_status: Option<String>,
    #[serde(rename = "po_debt_approver")]
    pub approver: Option<String>,
    #[serde(rename = "po_debt_close_date")]
    pub close_date: Option<NaiveDate>,
    #[serde(rename = "po_debt_fiscal_year")]
    pub fiscal_year: Option<String>,
    #[serde(rename = "po_debt_rate")]
    pub rate: Option<f64>,
    #[serde(rename = "po_debt_area")]
    pub area: String,
    #[serde(rename = "po_debt_order_total")]
    pub order_total: Option<f64>,
    #[serde(rename = "po_debt_order_total_usd")]
    pub order_total_usd: Option<f64>,
    #[serde(rename = "po_debt_linked_total")]
    pub linked_total: Option<f64>,
    #[serde(rename = "po_debt_linked_total_usd")]
    pub linked_total_usd: Option<f64>,
    #[serde(rename = "po_debt_real_debt")]
    pub real_debt: Option<f64>,
    #[serde(rename = "po_debt_note")]
    pub note: Option<String>,
    #[serde(rename = "po_debt_run_id")]
    pub run_id: Uuid,
    #[serde(rename = "po_debt_loaded_at")]
    pub loaded_at: DateTime<Utc>,
}

/// Map enriched rows to warehouse layout, stamping the run
pub fn warehouse_rows(
    rows: &[EnrichedOrder],
    run_id: Uuid,
    loaded_at: DateTime<Utc>,
) -> Vec<WarehouseRow> {
    rows.iter()
        .map(|row| {
            let order = &row.order;
            WarehouseRow {
                order_no: order.order_no.clone(),
                vendor: order.vendor.clone(),
                branch: order.branch.clone(),
                currency: order.currency.clone(),
                price_override: order.price_override,
                amount: order.amount,
                amount_received: order.amount_received,
                amount_linked: order.amount_linked,
                order_date: order.order_date,
                unit_of_measure: order.unit_of_measure.clone(),
                description: order.description.clone(),
                charge_account: order.charge_account.clone(),
                requester: order.requester.clone(),
                closure_status: order.closure_status.clone(),
                approver: order.approver.clone(),
                close_date: order.close_date,
                fiscal_year: row.fiscal_year.clone(),
                rate: row.rate,
                area: row.area.clone(),
                order_total: row.order_total,
                order_total_usd: row.order_total_usd,
                linked_total: row.linked_total,
                linked_total_usd: row.linked_total_usd,
                real_debt: row.real_debt,
                note: row.note.clone(),
                run_id,
                loaded_at,
            }
        })
        .collect()
}

/// One rate row as stored in the warehouse rates table
#[derive(Debug, Clone, Deserialize)]
struct RateRow {
    date: NaiveDate,
    currency: String,
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct RowsResponse<T> {
    rows: Vec<T>,
}

/// Client for the warehouse JSON API
#[derive(Debug, Clone)]
pub struct WarehouseClient {
    http: reqwest::Client,
    config: WarehouseConfig,
    token: Option<String>,
}

impl WarehouseClient {
    pub fn new(config: WarehouseConfig, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/datasets/{}/tables/{}/rows",
            self.config.base_url.trim_end_matches('/'),
            self.config.dataset,
            table
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Append rows to the report table
    pub async fn append_rows(&self, rows: &[WarehouseRow]) -> Result<usize> {
        let url = self.table_url(&self.config.table);
        let payload = serde_json::json!({
            "writeMode": "append",
            "rows": rows,
        });

        let response = self
            .authorize(self.http.post(&url))
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("warehouse append request failed: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("warehouse append returned {}: {}", status, body);
        }

        log::info!("warehouse append: {} rows -> {}", rows.len(), url);
        Ok(rows.len())
    }

    /// Fetch the rate table from the configured rates table
    pub async fn fetch_rate_table(&self) -> Result<RateTable> {
        let url = self.table_url(&self.config.rates_table);

        let response = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .with_context(|| format!("warehouse rates request failed: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("warehouse rates query returned {}: {}", status, body);
        }

        let rows: RowsResponse<RateRow> = response
            .json()
            .await
            .context("failed to decode warehouse rate rows")?;

        let mut table = RateTable::new();
        for row in rows.rows {
            table.insert(row.date, &row.currency, row.rate);
        }
        if table.is_empty() {
            bail!("warehouse rates table {} returned no rows", self.config.rates_table);
        }

        log::info!("warehouse rates fetched: {} dates", table.len());
        Ok(table)
    }
}
