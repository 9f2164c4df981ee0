//! Column names for the order workbook and the generated report

/// Columns every purchase-order workbook must provide.
/// Matching is case-insensitive and whitespace-trimmed.
pub const EXPECTED_COLUMNS: [&str; 16] = [
    "ORDER_NO",
    "VENDOR",
    "BRANCH",
    "CURRENCY",
    "PRICE_OVERRIDE",
    "AMOUNT",
    "AMOUNT_RECEIVED",
    "AMOUNT_LINKED",
    "ORDER_DATE",
    "UNIT_OF_MEASURE",
    "DESCRIPTION",
    "CHARGE_ACCOUNT",
    "REQUESTER",
    "CLOSURE_STATUS",
    "APPROVER",
    "CLOSE_DATE",
];

/// Columns the pipeline computes, appended after the input columns
pub mod computed {
    pub const FISCAL_YEAR: &str = "FISCAL_YEAR";
    pub const RATE: &str = "RATE";
    pub const AREA: &str = "AREA";
    pub const ORDER_TOTAL: &str = "ORDER_TOTAL";
    pub const ORDER_TOTAL_USD: &str = "ORDER_TOTAL_USD";
    pub const LINKED_TOTAL: &str = "LINKED_TOTAL";
    pub const LINKED_TOTAL_USD: &str = "LINKED_TOTAL_USD";
    pub const REAL_DEBT: &str = "REAL_DEBT";
    pub const NOTE: &str = "NOTE";
}

/// Full column order of the "Orders" sheet in the generated report
pub const REPORT_COLUMNS: [&str; 25] = [
    "ORDER_NO",
    "VENDOR",
    "BRANCH",
    "CURRENCY",
    "PRICE_OVERRIDE",
    "AMOUNT",
    "AMOUNT_RECEIVED",
    "AMOUNT_LINKED",
    "ORDER_DATE",
    "UNIT_OF_MEASURE",
    "DESCRIPTION",
    "CHARGE_ACCOUNT",
    "REQUESTER",
    "CLOSURE_STATUS",
    "APPROVER",
    "CLOSE_DATE",
    computed::FISCAL_YEAR,
    computed::RATE,
    computed::AREA,
    computed::ORDER_TOTAL,
    computed::ORDER_TOTAL_USD,
    computed::LINKED_TOTAL,
    computed::LINKED_TOTAL_USD,
    computed::REAL_DEBT,
    computed::NOTE,
];

/// Normalize a header cell for comparison
pub fn normalize_header(name: &str) -> String {
    name.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_columns_extend_expected() {
        for (i, col) in EXPECTED_COLUMNS.iter().enumerate() {
            assert_eq!(REPORT_COLUMNS[i], *col);
        }
        assert_eq!(REPORT_COLUMNS.last(), Some(&computed::NOTE));
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  order_no "), "ORDER_NO");
    }
}
