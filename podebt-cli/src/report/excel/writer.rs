//! Write the enriched debt report workbook
//!
//! Two sheets: "Orders" (input columns plus computed columns, NOTE last)
//! and "Rates" (the table that backed conversion). Header cells get the
//! report fill, columns are width-fitted, and the header row is frozen.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::report::pipeline::DebtReport;
use crate::report::rates::RateTable;
use crate::report::types::{EnrichedOrder, REPORT_COLUMNS};

pub const ORDERS_SHEET: &str = "Orders";
pub const RATES_SHEET: &str = "Rates";

const HEADER_FILL: u32 = 0x4472C4;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

fn money_format() -> Format {
    Format::new().set_num_format("#,##0.00")
}

/// Sequential cell writer for one row
struct RowWriter<'a> {
    sheet: &'a mut Worksheet,
    row: u32,
    col: u16,
}

impl<'a> RowWriter<'a> {
    fn new(sheet: &'a mut Worksheet, row: u32) -> Self {
        Self { sheet, row, col: 0 }
    }

    fn text(&mut self, value: Option<&str>) -> Result<()> {
        if let Some(s) = value {
            self.sheet.write_string(self.row, self.col, s)?;
        }
        self.col += 1;
        Ok(())
    }

    fn number(&mut self, value: Option<f64>) -> Result<()> {
        if let Some(n) = value {
            self.sheet.write_number(self.row, self.col, n)?;
        }
        self.col += 1;
        Ok(())
    }

    fn money(&mut self, value: Option<f64>, format: &Format) -> Result<()> {
        if let Some(n) = value {
            self.sheet
                .write_number_with_format(self.row, self.col, n, format)?;
        }
        self.col += 1;
        Ok(())
    }

    fn date(&mut self, value: Option<NaiveDate>) -> Result<()> {
        self.text(value.map(|d| d.format("%Y-%m-%d").to_string()).as_deref())
    }
}

fn write_orders_sheet(sheet: &mut Worksheet, rows: &[EnrichedOrder]) -> Result<()> {
    sheet.set_name(ORDERS_SHEET)?;
    let header = header_format();
    let money = money_format();

    for (col, name) in REPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let order = &row.order;
        let mut w = RowWriter::new(sheet, (idx + 1) as u32);
        w.text(order.order_no.as_deref())?;
        w.text(order.vendor.as_deref())?;
        w.text(order.branch.as_deref())?;
        w.text(order.currency.as_deref())?;
        w.number(order.price_override)?;
        w.money(order.amount, &money)?;
        w.money(order.amount_received, &money)?;
        w.money(order.amount_linked, &money)?;
        w.date(order.order_date)?;
        w.text(order.unit_of_measure.as_deref())?;
        w.text(order.description.as_deref())?;
        w.text(order.charge_account.as_deref())?;
        w.text(order.requester.as_deref())?;
        w.text(order.closure_status.as_deref())?;
        w.text(order.approver.as_deref())?;
        w.date(order.close_date)?;
        w.text(row.fiscal_year.as_deref())?;
        w.number(row.rate)?;
        w.text(Some(row.area.as_str()))?;
        w.money(row.order_total, &money)?;
        w.money(row.order_total_usd, &money)?;
        w.money(row.linked_total, &money)?;
        w.money(row.linked_total_usd, &money)?;
        w.money(row.real_debt, &money)?;
        w.text(row.note.as_deref())?;
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();
    Ok(())
}

fn write_rates_sheet(sheet: &mut Worksheet, rates: &RateTable) -> Result<()> {
    sheet.set_name(RATES_SHEET)?;
    let header = header_format();

    let currencies: Vec<String> = rates.currencies().into_iter().collect();
    sheet.write_string_with_format(0, 0, "DATE", &header)?;
    for (idx, code) in currencies.iter().enumerate() {
        let name = format!("{}/USD", code);
        sheet.write_string_with_format(0, (idx + 1) as u16, name, &header)?;
    }

    for (idx, entry) in rates.entries().iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, entry.date.format("%Y-%m-%d").to_string())?;
        for (col, code) in currencies.iter().enumerate() {
            if let Some(rate) = entry.rates.get(code) {
                sheet.write_number(row, (col + 1) as u16, *rate)?;
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();
    Ok(())
}

/// Write the report workbook to disk
pub fn write_report<P: AsRef<Path>>(report: &DebtReport, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    write_orders_sheet(workbook.add_worksheet(), &report.rows)?;
    write_rates_sheet(workbook.add_worksheet(), &report.rates)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to save report workbook: {}", path.display()))?;

    log::info!("report written: {} ({} rows)", path.display(), report.rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::PurchaseOrder;
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use chrono::NaiveDate;

    #[test]
    fn test_written_report_has_expected_sheets_and_headers() {
        let path = std::env::temp_dir().join(format!(
            "podebt-writer-{}-roundtrip.xlsx",
            std::process::id()
        ));

        let mut rates = RateTable::new();
        rates.insert(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), "VES", 40.0);
        let report = DebtReport {
            rows: vec![EnrichedOrder {
                order: PurchaseOrder {
                    order_no: Some("PO-1".into()),
                    currency: Some("VES".into()),
                    ..Default::default()
                },
                area: "Operations".into(),
                order_total_usd: Some(25.0),
                real_debt: Some(25.0),
                ..Default::default()
            }],
            rates,
        };

        write_report(&report, &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let names = workbook.sheet_names();
        assert_eq!(names, vec![ORDERS_SHEET.to_string(), RATES_SHEET.to_string()]);

        let range = workbook.worksheet_range(ORDERS_SHEET).unwrap();
        let first_row: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|c| match c {
                Data::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(first_row, REPORT_COLUMNS.to_vec());

        std::fs::remove_file(&path).ok();
    }
}
