//! Read purchase orders from Excel files
//!
//! The header row is auto-detected: the first few rows are scanned for the
//! row carrying all expected column names, and data is read below it. A
//! workbook missing expected columns is a fatal input error.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::report::types::{EXPECTED_COLUMNS, PurchaseOrder, Value, normalize_header};

/// Rows scanned from the top when locating the header row
const HEADER_SCAN_ROWS: usize = 5;

/// Result of reading an order workbook
#[derive(Debug, Clone)]
pub struct OrdersWorkbook {
    pub orders: Vec<PurchaseOrder>,
    /// Zero-based index of the detected header row
    pub header_row: usize,
}

/// Header validation outcome for the `check` command
#[derive(Debug, Clone)]
pub struct HeaderReport {
    pub header_row: usize,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

impl HeaderReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

fn normalized_row(row: &[Data]) -> Vec<String> {
    row.iter()
        .map(|cell| {
            Value::from_cell(cell)
                .to_text()
                .map(|s| normalize_header(&s))
                .unwrap_or_default()
        })
        .collect()
}

/// Find the row containing every expected column name
fn detect_header_row(rows: &[Vec<Data>]) -> Option<usize> {
    for (idx, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let cells = normalized_row(row);
        if EXPECTED_COLUMNS
            .iter()
            .all(|col| cells.iter().any(|c| c == col))
        {
            return Some(idx);
        }
    }
    None
}

fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Data>>> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("failed to open order workbook: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("order workbook has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {}", sheet_name))?;

    Ok(range.rows().map(|r| r.to_vec()).collect())
}

/// Read a purchase-order workbook into typed rows
pub fn read_orders_workbook<P: AsRef<Path>>(path: P) -> Result<OrdersWorkbook> {
    let rows = load_rows(&path)?;
    if rows.is_empty() {
        bail!("order workbook is empty");
    }

    let header_row = match detect_header_row(&rows) {
        Some(idx) => idx,
        None => {
            log::warn!("no header row detected, falling back to the first row");
            0
        }
    };

    let headers = normalized_row(&rows[header_row]);
    let missing: Vec<&str> = EXPECTED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .copied()
        .collect();
    if !missing.is_empty() {
        bail!(
            "order workbook is missing expected columns: {}",
            missing.join(", ")
        );
    }

    // First occurrence wins when a name repeats
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        for col in EXPECTED_COLUMNS {
            if name == col {
                index.entry(col).or_insert(idx);
            }
        }
    }

    let cell = |row: &[Data], name: &str| -> Value {
        index
            .get(name)
            .and_then(|i| row.get(*i))
            .map(Value::from_cell)
            .unwrap_or_default()
    };

    let mut orders = Vec::new();
    for row in rows.iter().skip(header_row + 1) {
        if row.iter().all(|c| Value::from_cell(c).is_null()) {
            continue;
        }
        orders.push(PurchaseOrder {
            order_no: cell(row, "ORDER_NO").to_text(),
            vendor: cell(row, "VENDOR").to_text(),
            branch: cell(row, "BRANCH").to_text(),
            currency: cell(row, "CURRENCY").to_text(),
            price_override: cell(row, "PRICE_OVERRIDE").to_f64(),
            amount: cell(row, "AMOUNT").to_f64(),
            amount_received: cell(row, "AMOUNT_RECEIVED").to_f64(),
            amount_linked: cell(row, "AMOUNT_LINKED").to_f64(),
            order_date: cell(row, "ORDER_DATE").to_date(),
            unit_of_measure: cell(row, "UNIT_OF_MEASURE").to_text(),
            description: cell(row, "DESCRIPTION").to_text(),
            charge_account: cell(row, "CHARGE_ACCOUNT").to_text(),
            requester: cell(row, "REQUESTER").to_text(),
            closure_status: cell(row, "CLOSURE_STATUS").to_text(),
            approver: cell(row, "APPROVER").to_text(),
            close_date: cell(row, "CLOSE_DATE").to_date(),
        });
    }

    log::info!(
        "order workbook read: {} rows (header at row {})",
        orders.len(),
        header_row + 1
    );
    Ok(OrdersWorkbook { orders, header_row })
}

/// Validate a workbook's headers without reading its data
pub fn inspect_headers<P: AsRef<Path>>(path: P) -> Result<HeaderReport> {
    let rows = load_rows(&path)?;
    if rows.is_empty() {
        bail!("order workbook is empty");
    }

    let header_row = detect_header_row(&rows).unwrap_or(0);
    let headers = normalized_row(&rows[header_row]);

    let missing = EXPECTED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    let extra = headers
        .iter()
        .filter(|h| !h.is_empty() && !EXPECTED_COLUMNS.contains(&h.as_str()))
        .cloned()
        .collect();

    Ok(HeaderReport {
        header_row,
        missing,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    fn temp_xlsx(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("podebt-orders-{}-{}.xlsx", std::process::id(), name))
    }

    fn write_sample(path: &PathBuf, header_row: u32, columns: &[&str]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        if header_row > 0 {
            sheet.write_string(0, 0, "Purchase Orders Export").unwrap();
        }
        for (col, name) in columns.iter().enumerate() {
            sheet.write_string(header_row, col as u16, *name).unwrap();
        }
        let data = header_row + 1;
        sheet.write_string(data, 0, "PO-100").unwrap();
        sheet.write_string(data, 3, "VES").unwrap();
        sheet.write_number(data, 4, 1.5).unwrap();
        sheet.write_number(data, 5, 200.0).unwrap();
        sheet.write_string(data, 8, "2025-01-06").unwrap();
        sheet.write_string(data, 12, "jdoe").unwrap();
        sheet.write_string(data, 13, "OPEN").unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_header_detected_below_title_row() {
        let path = temp_xlsx("detect");
        write_sample(&path, 2, &EXPECTED_COLUMNS);

        let parsed = read_orders_workbook(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(parsed.header_row, 2);
        assert_eq!(parsed.orders.len(), 1);
        let order = &parsed.orders[0];
        assert_eq!(order.order_no.as_deref(), Some("PO-100"));
        assert_eq!(order.currency.as_deref(), Some("VES"));
        assert_eq!(order.price_override, Some(1.5));
        assert_eq!(order.amount, Some(200.0));
        assert_eq!(order.order_date, NaiveDate::from_ymd_opt(2025, 1, 6));
        assert_eq!(order.closure_status.as_deref(), Some("OPEN"));
    }

    #[test]
    fn test_missing_columns_are_fatal_and_named() {
        let path = temp_xlsx("missing");
        let partial: Vec<&str> = EXPECTED_COLUMNS[..10].to_vec();
        write_sample(&path, 0, &partial);

        let err = read_orders_workbook(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        let message = err.to_string();
        assert!(message.contains("missing expected columns"));
        assert!(message.contains("CLOSURE_STATUS"));
    }

    #[test]
    fn test_inspect_headers_reports_extras() {
        let path = temp_xlsx("inspect");
        let mut columns: Vec<&str> = EXPECTED_COLUMNS.to_vec();
        columns.push("COMMENTS");
        write_sample(&path, 0, &columns);

        let report = inspect_headers(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(report.is_valid());
        assert_eq!(report.extra, vec!["COMMENTS".to_string()]);
    }
}
