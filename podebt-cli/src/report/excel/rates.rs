//! Read exchange-rate workbooks
//!
//! Rate books carry a DATE column plus one column per currency pair named
//! `<BASE>/<QUOTE>` (e.g. `VES/USD`). Only `<CODE>/USD` columns feed
//! resolution; other pairs are ignored. Multi-sheet workbooks read the
//! second sheet (cover-sheet convention); single-sheet workbooks use the
//! only sheet.

use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, Xlsx, open_workbook};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::report::rates::RateTable;
use crate::report::types::{Value, normalize_header};

/// Rows scanned from the top when locating the header row
const HEADER_SCAN_ROWS: usize = 10;

/// Pair columns needed before a row counts as the header
const MIN_PAIR_COLUMNS: usize = 3;

static PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{3})/([A-Z]{3})$").expect("static pair regex"));

/// Base currency of a `<BASE>/USD` pair column, if that is what this is
fn usd_pair_base(header: &str) -> Option<String> {
    let caps = PAIR_RE.captures(header)?;
    let (base, quote) = (caps.get(1)?.as_str(), caps.get(2)?.as_str());
    (quote == "USD").then(|| base.to_string())
}

fn is_pair_header(header: &str) -> bool {
    PAIR_RE.is_match(header)
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

/// Find the row carrying a DATE column and enough pair columns
fn detect_header_row(rows: &[Vec<Data>]) -> Option<usize> {
    for (idx, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let cells = normalized_row(row);
        let has_date = cells.iter().any(|c| c.contains("DATE"));
        let pairs = cells.iter().filter(|c| is_pair_header(c)).count();
        if has_date && pairs >= MIN_PAIR_COLUMNS {
            return Some(idx);
        }
    }
    None
}

/// Read a rate workbook into a [`RateTable`]
pub fn read_rate_workbook<P: AsRef<Path>>(path: P) -> Result<RateTable> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("failed to open rate workbook: {}", path.display()))?;

    let names = workbook.sheet_names();
    let sheet_name = match names.len() {
        0 => bail!("rate workbook has no sheets"),
        1 => names[0].clone(),
        _ => names[1].clone(),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {}", sheet_name))?;
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    if rows.is_empty() {
        bail!("rate workbook sheet '{}' is empty", sheet_name);
    }

    let header_row = match detect_header_row(&rows) {
        Some(idx) => idx,
        None => {
            log::warn!("no rate header row detected, falling back to the first row");
            0
        }
    };
    let headers = normalized_row(&rows[header_row]);

    let date_col = match headers.iter().position(|h| h.contains("DATE")) {
        Some(idx) => idx,
        None => {
            log::warn!("no DATE column found, falling back to the first column");
            0
        }
    };

    // (column index, base currency) for every <CODE>/USD column
    let rate_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| usd_pair_base(h).map(|base| (idx, base)))
        .collect();
    if rate_cols.is_empty() {
        bail!(
            "rate workbook sheet '{}' has no <CODE>/USD columns",
            sheet_name
        );
    }

    let mut table = RateTable::new();
    let mut skipped = 0usize;
    for row in rows.iter().skip(header_row + 1) {
        let date = row
            .get(date_col)
            .map(Value::from_cell)
            .and_then(|v| v.to_date());
        let Some(date) = date else {
            if row.iter().any(|c| !Value::from_cell(c).is_null()) {
                skipped += 1;
            }
            continue;
        };
        for (idx, code) in &rate_cols {
            if let Some(rate) = row.get(*idx).map(Value::from_cell).and_then(|v| v.to_f64()) {
                table.insert(date, code, rate);
            }
        }
    }
    if skipped > 0 {
        log::warn!("rate workbook: {} rows skipped (unparseable date)", skipped);
    }

    log::info!(
        "rate workbook read: {} dates, currencies: {:?}",
        table.len(),
        table.currencies()
    );
    Ok(table)
}
