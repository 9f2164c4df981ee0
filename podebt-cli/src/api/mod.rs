//! Clients for the upload targets
//!
//! Thin JSON/byte wrappers over reqwest for the warehouse table and the
//! object store. No retry or backoff beyond what reqwest provides.

pub mod storage;
pub mod warehouse;

pub use storage::{RunReports, StorageClient, StoredReport, report_object_path};
pub use warehouse::{WarehouseClient, WarehouseRow, warehouse_rows};
