//! Purchase-order row types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A purchase-order row as read from the workbook.
/// Immutable once read; any cell may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub order_no: Option<String>,
    pub vendor: Option<String>,
    pub branch: Option<String>,
    pub currency: Option<String>,
    pub price_override: Option<f64>,
    pub amount: Option<f64>,
    pub amount_received: Option<f64>,
    pub amount_linked: Option<f64>,
    pub order_date: Option<NaiveDate>,
    pub unit_of_measure: Option<String>,
    pub description: Option<String>,
    pub charge_account: Option<String>,
    pub requester: Option<String>,
    pub closure_status: Option<String>,
    pub approver: Option<String>,
    pub close_date: Option<NaiveDate>,
}

impl PurchaseOrder {
    /// Currency code normalized for comparisons, if present
    pub fn currency_code(&self) -> Option<String> {
        self.currency
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
    }
}

/// A purchase order plus the computed report columns.
/// Created once by the pipeline and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub order: PurchaseOrder,
    /// Accounting year label derived from the order date
    pub fiscal_year: Option<String>,
    /// Rate used for conversion; None for USD orders or when unresolved
    pub rate: Option<f64>,
    /// Organizational area, or the unassigned sentinel
    pub area: String,
    pub order_total: Option<f64>,
    pub order_total_usd: Option<f64>,
    pub linked_total: Option<f64>,
    pub linked_total_usd: Option<f64>,
    pub real_debt: Option<f64>,
    /// Set when conversion could not complete; flagged rows are kept
    pub note: Option<String>,
}

impl EnrichedOrder {
    /// Whether conversion failed for this row
    pub fn is_flagged(&self) -> bool {
        self.note.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_normalizes() {
        let order = PurchaseOrder {
            currency: Some(" ves ".into()),
            ..Default::default()
        };
        assert_eq!(order.currency_code(), Some("VES".into()));

        let blank = PurchaseOrder {
            currency: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.currency_code(), None);
    }
}
