//! Fiscal-year and area annotation

use crate::report::areas::AreaDirectory;
use crate::report::types::{EnrichedOrder, PurchaseOrder};

use super::fiscal::fiscal_year;

/// Annotate filtered orders with fiscal year and organizational area.
/// Unmapped requesters get the unassigned sentinel; nothing here aborts
/// the batch.
pub fn enrich(orders: Vec<PurchaseOrder>, areas: &AreaDirectory) -> Vec<EnrichedOrder> {
    orders
        .into_iter()
        .map(|order| {
            let fiscal_year = order.order_date.map(fiscal_year);
            let area = areas.lookup(order.requester.as_deref());
            EnrichedOrder {
                order,
                fiscal_year,
                area,
                ..Default::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_enrich_annotates_fiscal_year_and_area() {
        let directory =
            AreaDirectory::from_csv("REQUESTER,AREA\njdoe,Operations\n".as_bytes()).unwrap();
        let orders = vec![
            PurchaseOrder {
                requester: Some("jdoe".into()),
                order_date: NaiveDate::from_ymd_opt(2025, 10, 2),
                ..Default::default()
            },
            PurchaseOrder {
                requester: Some("stranger".into()),
                order_date: None,
                ..Default::default()
            },
        ];

        let rows = enrich(orders, &directory);
        assert_eq!(rows[0].fiscal_year.as_deref(), Some("2025-2026"));
        assert_eq!(rows[0].area, "Operations");
        assert_eq!(rows[1].fiscal_year, None);
        assert_eq!(rows[1].area, crate::report::areas::UNASSIGNED_AREA);
    }
}
