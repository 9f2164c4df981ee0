//! Workbook ingestion and report serialization

pub mod orders;
pub mod rates;
pub mod writer;

pub use orders::{HeaderReport, OrdersWorkbook, inspect_headers, read_orders_workbook};
pub use rates::read_rate_workbook;
pub use writer::{ORDERS_SHEET, RATES_SHEET, write_report};
