//! Closed-order filtering

use crate::report::types::PurchaseOrder;

/// CLOSURE_STATUS value marking orders the filter drops
pub const CLOSED_STATUS: &str = "CLOSED";

/// Drop orders whose closure status is the closed sentinel.
/// Pure and order-preserving; rows without a status are kept.
pub fn filter_closed(orders: Vec<PurchaseOrder>) -> Vec<PurchaseOrder> {
    let before = orders.len();
    let kept: Vec<PurchaseOrder> = orders
        .into_iter()
        .filter(|order| {
            order
                .closure_status
                .as_deref()
                .map(|s| s.trim().to_uppercase() != CLOSED_STATUS)
                .unwrap_or(true)
        })
        .collect();
    log::info!(
        "closed-order filter: dropped {}, kept {}",
        before - kept.len(),
        kept.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(no: &str, status: Option<&str>) -> PurchaseOrder {
        PurchaseOrder {
            order_no: Some(no.to_string()),
            closure_status: status.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_closed_order_survives() {
        let orders = vec![
            order("1", Some("OPEN")),
            order("2", Some("CLOSED")),
            order("3", Some(" closed ")),
            order("4", None),
        ];
        let kept = filter_closed(orders);
        assert!(
            kept.iter()
                .all(|o| o.closure_status.as_deref().map(|s| s.trim().to_uppercase())
                    != Some(CLOSED_STATUS.to_string()))
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_order_is_preserved() {
        let orders = vec![
            order("a", Some("OPEN")),
            order("b", Some("CLOSED")),
            order("c", Some("PARTIAL")),
            order("d", Some("OPEN")),
        ];
        let kept = filter_closed(orders);
        let nos: Vec<_> = kept.iter().filter_map(|o| o.order_no.clone()).collect();
        assert_eq!(nos, vec!["a", "c", "d"]);
    }
}
