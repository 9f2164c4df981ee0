//! Fiscal-year derivation

use chrono::{Datelike, NaiveDate};

/// First month of the fiscal year (September)
const FISCAL_YEAR_START_MONTH: u32 = 9;

/// Fiscal-year label for an order date.
/// September through December belong to "{y}-{y+1}"; January through
/// August belong to "{y-1}-{y}".
pub fn fiscal_year(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= FISCAL_YEAR_START_MONTH {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fiscal_year_boundary_months() {
        assert_eq!(fiscal_year(date(2025, 8, 31)), "2024-2025");
        assert_eq!(fiscal_year(date(2025, 9, 1)), "2025-2026");
    }

    #[test]
    fn test_fiscal_year_midyear_months() {
        assert_eq!(fiscal_year(date(2026, 3, 14)), "2025-2026");
        assert_eq!(fiscal_year(date(2025, 12, 31)), "2025-2026");
        assert_eq!(fiscal_year(date(2026, 1, 1)), "2025-2026");
    }
}
