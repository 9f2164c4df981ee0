//! Amount totals and USD conversion

use crate::report::rates::RateSource;
use crate::report::types::EnrichedOrder;

/// Currency that needs no conversion
pub const USD: &str = "USD";

fn product(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? * b?)
}

/// Compute order/linked totals and convert them to USD.
///
/// `usd = total / rate`, with the rate resolved for (order date, currency).
/// Rows whose rate is missing, zero, or unresolvable keep their USD columns
/// empty and get a note; they are retained so downstream totals stay
/// auditable.
pub fn convert_to_usd(rows: &mut [EnrichedOrder], rates: &dyn RateSource) {
    let mut flagged = 0usize;

    for row in rows.iter_mut() {
        row.order_total = product(row.order.price_override, row.order.amount);
        row.linked_total = product(row.order.price_override, row.order.amount_linked);

        // Nothing to convert
        if row.order_total.is_none() && row.linked_total.is_none() {
            continue;
        }

        let currency = row.order.currency_code();
        if currency.as_deref() == Some(USD) {
            row.order_total_usd = row.order_total;
            row.linked_total_usd = row.linked_total;
            continue;
        }

        let Some(code) = currency else {
            row.note = Some("currency missing; amounts not converted".to_string());
            flagged += 1;
            continue;
        };
        let Some(date) = row.order.order_date else {
            row.note = Some(format!("order date missing; no {} rate resolved", code));
            flagged += 1;
            continue;
        };

        match rates.rate_on(&code, date) {
            Some(resolved) if resolved.rate > 0.0 => {
                if resolved.is_fallback(date) {
                    log::warn!(
                        "no {} rate for {}, using prior date {}",
                        code,
                        date,
                        resolved.date
                    );
                }
                row.rate = Some(resolved.rate);
                row.order_total_usd = row.order_total.map(|t| t / resolved.rate);
                row.linked_total_usd = row.linked_total.map(|t| t / resolved.rate);
            }
            Some(resolved) => {
                row.rate = Some(resolved.rate);
                row.note = Some(format!(
                    "unusable {} rate {} on {}",
                    code, resolved.rate, resolved.date
                ));
                flagged += 1;
            }
            None => {
                row.note = Some(format!("no {} rate on or before {}", code, date));
                flagged += 1;
            }
        }
    }

    log::info!(
        "currency conversion: {} rows, {} flagged",
        rows.len(),
        flagged
    );
}
