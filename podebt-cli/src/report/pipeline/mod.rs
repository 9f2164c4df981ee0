//! Row-level transformation pipeline
//!
//! Filter closed orders, annotate fiscal year and area, convert amounts to
//! USD, derive real debt. Synchronous, row-at-a-time, no shared state.

mod convert;
mod debt;
mod enrich;
mod filter;
mod fiscal;

pub use convert::{USD, convert_to_usd};
pub use debt::compute_real_debt;
pub use enrich::enrich;
pub use filter::{CLOSED_STATUS, filter_closed};
pub use fiscal::fiscal_year;

use crate::report::areas::AreaDirectory;
use crate::report::rates::{RateSource, RateTable};
use crate::report::types::{EnrichedOrder, PurchaseOrder};

/// Output of a processing run: the enriched rows plus the rate table
/// that backed conversion (echoed into the report workbook).
#[derive(Debug, Clone)]
pub struct DebtReport {
    pub rows: Vec<EnrichedOrder>,
    pub rates: RateTable,
}

impl DebtReport {
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Rows whose conversion failed and carry a note
    pub fn flagged_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_flagged()).count()
    }

    pub fn converted_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.order_total_usd.is_some())
            .count()
    }
}

/// Run the full transformation over already-read inputs
pub fn build_report(
    orders: Vec<PurchaseOrder>,
    rates: RateTable,
    areas: &AreaDirectory,
) -> DebtReport {
    let open = filter_closed(orders);
    let mut rows = enrich(open, areas);
    convert_to_usd(&mut rows, &rates);
    compute_real_debt(&mut rows);
    DebtReport { rows, rates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_build_report_end_to_end() {
        let mut rates = RateTable::new();
        rates.insert(date(2025, 1, 6), "VES", 40.0);
        let areas =
            AreaDirectory::from_csv("REQUESTER,AREA\njdoe,Operations\n".as_bytes()).unwrap();

        let orders = vec![
            PurchaseOrder {
                order_no: Some("PO-1".into()),
                currency: Some("VES".into()),
                price_override: Some(1.0),
                amount: Some(1000.0),
                amount_linked: Some(200.0),
                order_date: Some(date(2025, 1, 6)),
                requester: Some("jdoe".into()),
                closure_status: Some("OPEN".into()),
                ..Default::default()
            },
            PurchaseOrder {
                order_no: Some("PO-2".into()),
                closure_status: Some("CLOSED".into()),
                ..Default::default()
            },
            PurchaseOrder {
                order_no: Some("PO-3".into()),
                currency: Some("EUR".into()),
                price_override: Some(1.0),
                amount: Some(10.0),
                order_date: Some(date(2025, 1, 6)),
                requester: Some("stranger".into()),
                ..Default::default()
            },
        ];

        let report = build_report(orders, rates, &areas);

        // Closed order dropped, flagged row retained
        assert_eq!(report.total_rows(), 2);
        assert_eq!(report.flagged_count(), 1);
        assert_eq!(report.converted_count(), 1);

        let first = &report.rows[0];
        assert_eq!(first.order_total_usd, Some(25.0));
        assert_eq!(first.linked_total_usd, Some(5.0));
        assert_eq!(first.real_debt, Some(20.0));
        assert_eq!(first.area, "Operations");
        assert_eq!(first.fiscal_year.as_deref(), Some("2024-2025"));

        let flagged = &report.rows[1];
        assert_eq!(flagged.real_debt, None);
        assert!(flagged.is_flagged());
        assert_eq!(flagged.area, crate::report::areas::UNASSIGNED_AREA);
    }
}
