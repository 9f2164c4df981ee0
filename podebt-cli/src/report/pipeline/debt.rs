//! Real-debt derivation

use crate::report::types::EnrichedOrder;

/// Real debt is the order total USD minus the linked total USD.
/// An absent converted operand contributes 0; a row where both are absent
/// has no real debt.
pub fn compute_real_debt(rows: &mut [EnrichedOrder]) {
    for row in rows.iter_mut() {
        row.real_debt = match (row.order_total_usd, row.linked_total_usd) {
            (None, None) => None,
            (order, linked) => Some(order.unwrap_or(0.0) - linked.unwrap_or(0.0)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(order_usd: Option<f64>, linked_usd: Option<f64>) -> EnrichedOrder {
        EnrichedOrder {
            order_total_usd: order_usd,
            linked_total_usd: linked_usd,
            ..Default::default()
        }
    }

    #[test]
    fn test_real_debt_is_order_minus_linked() {
        let mut rows = vec![row(Some(25.0), Some(10.0))];
        compute_real_debt(&mut rows);
        assert_eq!(rows[0].real_debt, Some(15.0));
    }

    #[test]
    fn test_absent_linked_contributes_zero() {
        let mut rows = vec![row(Some(25.0), None), row(None, Some(10.0))];
        compute_real_debt(&mut rows);
        assert_eq!(rows[0].real_debt, Some(25.0));
        assert_eq!(rows[1].real_debt, Some(-10.0));
    }

    #[test]
    fn test_both_absent_yields_no_debt() {
        let mut rows = vec![row(None, None)];
        compute_real_debt(&mut rows);
        assert_eq!(rows[0].real_debt, None);
    }
}
