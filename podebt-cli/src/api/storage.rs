//! Object-storage client
//!
//! Uploads the report workbook to a deterministic path keyed by the
//! processing timestamp and lists previously stored runs.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::StorageConfig;

/// Prefix all report objects live under
pub const REPORTS_PREFIX: &str = "reports";

/// Content type for xlsx uploads
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Deterministic object path for a run:
/// `reports/<YYYY-MM-DD_HH-MM-SS>/<file_name>`
pub fn report_object_path(run_at: DateTime<Utc>, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        REPORTS_PREFIX,
        run_at.format("%Y-%m-%d_%H-%M-%S"),
        file_name
    )
}

/// A stored report file
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub name: String,
    pub url: String,
    pub size: u64,
}

/// Files uploaded by one processing run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReports {
    /// Run timestamp folder, e.g. "2026-02-12_15-30-45"
    pub run: String,
    pub files: Vec<StoredReport>,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
    #[serde(default)]
    size: u64,
}

#[derive(Debug, Deserialize)]
struct ObjectList {
    objects: Vec<ObjectEntry>,
}

/// Client for the object-storage JSON/byte API
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    config: StorageConfig,
    token: Option<String>,
}

impl StorageClient {
    pub fn new(config: StorageConfig, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token,
        }
    }

    fn bucket_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.bucket
        )
    }

    /// Public download URL for an object path
    pub fn public_url(&self, object_path: &str) -> String {
        let base = self
            .config
            .public_base_url
            .as_deref()
            .unwrap_or(&self.config.base_url);
        format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            self.config.bucket,
            object_path
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Upload the report bytes; returns the public URL
    pub async fn upload_report(&self, object_path: &str, bytes: Vec<u8>) -> Result<String> {
        let url = format!("{}/{}", self.bucket_url(), object_path);

        let response = self
            .authorize(self.http.put(&url))
            .header(reqwest::header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("storage upload request failed: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("storage upload returned {}: {}", status, body);
        }

        let public = self.public_url(object_path);
        log::info!("report uploaded: {}", public);
        Ok(public)
    }

    /// List stored reports grouped by run, newest first
    pub async fn list_reports(&self, limit: usize) -> Result<Vec<RunReports>> {
        let url = format!("{}?prefix={}/", self.bucket_url(), REPORTS_PREFIX);

        let response = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .with_context(|| format!("storage list request failed: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("storage list returned {}: {}", status, body);
        }

        let list: ObjectList = response
            .json()
            .await
            .context("failed to decode storage object list")?;

        let mut runs = group_runs(list.objects, |path| self.public_url(path));
        runs.truncate(limit);
        Ok(runs)
    }
}

/// Group object names `reports/<run>/<file>` by run folder, newest first
fn group_runs(
    objects: Vec<ObjectEntry>,
    url_for: impl Fn(&str) -> String,
) -> Vec<RunReports> {
    use std::collections::BTreeMap;

    let mut by_run: BTreeMap<String, Vec<StoredReport>> = BTreeMap::new();
    for object in objects {
        let mut parts = object.name.splitn(3, '/');
        let (prefix, run, file) = (parts.next(), parts.next(), parts.next());
        let (Some(prefix), Some(run), Some(file)) = (prefix, run, file) else {
            continue;
        };
        if prefix != REPORTS_PREFIX || run.is_empty() || file.is_empty() {
            continue;
        }
        by_run.entry(run.to_string()).or_default().push(StoredReport {
            name: file.to_string(),
            url: url_for(&object.name),
            size: object.size,
        });
    }

    // BTreeMap iterates ascending; reverse for newest-first
    by_run
        .into_iter()
        .rev()
        .map(|(run, files)| RunReports { run, files })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_object_path_template() {
        let run_at = Utc.with_ymd_and_hms(2026, 2, 12, 15, 30, 45).unwrap();
        assert_eq!(
            report_object_path(run_at, "debt_report_2026-02-12.xlsx"),
            "reports/2026-02-12_15-30-45/debt_report_2026-02-12.xlsx"
        );
    }

    #[test]
    fn test_group_runs_newest_first() {
        let objects = vec![
            ObjectEntry {
                name: "reports/2026-01-01_10-00-00/a.xlsx".into(),
                size: 10,
            },
            ObjectEntry {
                name: "reports/2026-02-12_15-30-45/b.xlsx".into(),
                size: 20,
            },
            ObjectEntry {
                name: "reports/2026-01-01_10-00-00/c.xlsx".into(),
                size: 30,
            },
            // Not report objects
            ObjectEntry {
                name: "reports/".into(),
                size: 0,
            },
            ObjectEntry {
                name: "scratch/2026-03-01_00-00-00/d.xlsx".into(),
                size: 40,
            },
        ];

        let runs = group_runs(objects, |path| format!("https://cdn.example.com/{}", path));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].run, "2026-02-12_15-30-45");
        assert_eq!(runs[0].files.len(), 1);
        assert_eq!(
            runs[0].files[0].url,
            "https://cdn.example.com/reports/2026-02-12_15-30-45/b.xlsx"
        );
        assert_eq!(runs[1].run, "2026-01-01_10-00-00");
        assert_eq!(runs[1].files.len(), 2);
    }

    #[test]
    fn test_public_url_prefers_public_base() {
        let client = StorageClient::new(
            StorageConfig {
                base_url: "https://storage.example.com/api".into(),
                public_base_url: Some("https://cdn.example.com".into()),
                bucket: "debt-reports".into(),
            },
            None,
        );
        assert_eq!(
            client.public_url("reports/x/y.xlsx"),
            "https://cdn.example.com/debt-reports/reports/x/y.xlsx"
        );
    }
}
