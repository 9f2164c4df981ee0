//! Requester-to-area directory
//!
//! Loaded once per run from an externally published CSV export with
//! REQUESTER and AREA columns. Lookups never fail: requesters missing from
//! the directory get the [`UNASSIGNED_AREA`] sentinel.

use std::collections::HashMap;
use std::io::Read;

use anyhow::{Context, Result, bail};

/// Sentinel area for requesters missing from the directory
pub const UNASSIGNED_AREA: &str = "UNASSIGNED";

/// Case-insensitive requester -> area mapping
#[derive(Debug, Clone, Default)]
pub struct AreaDirectory {
    by_requester: HashMap<String, String>,
}

impl AreaDirectory {
    /// Empty directory; every lookup yields the sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a CSV export with REQUESTER and AREA columns.
    /// Header matching is case-insensitive; rows with an empty requester
    /// or area are skipped.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers().context("area directory has no header row")?;
        let mut requester_col = None;
        let mut area_col = None;
        for (idx, name) in headers.iter().enumerate() {
            let name = name.trim().to_uppercase();
            if name.contains("REQUESTER") && requester_col.is_none() {
                requester_col = Some(idx);
            } else if name.contains("AREA") && area_col.is_none() {
                area_col = Some(idx);
            }
        }
        let (requester_col, area_col) = match (requester_col, area_col) {
            (Some(r), Some(a)) => (r, a),
            _ => bail!("area directory is missing REQUESTER and AREA columns"),
        };

        let mut by_requester = HashMap::new();
        for record in csv.records() {
            let record = record.context("failed to read area directory row")?;
            let requester = record.get(requester_col).unwrap_or("").trim();
            let area = record.get(area_col).unwrap_or("").trim();
            if requester.is_empty() || area.is_empty() {
                continue;
            }
            by_requester.insert(requester.to_uppercase(), area.to_string());
        }

        log::info!("area directory loaded: {} requesters", by_requester.len());
        Ok(Self { by_requester })
    }

    /// Fetch and parse the directory from its published CSV URL
    pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Self> {
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to fetch area directory: {}", url))?;
        let status = response.status();
        if !status.is_success() {
            bail!("area directory fetch returned {}: {}", status, url);
        }
        let body = response
            .bytes()
            .await
            .context("failed to read area directory body")?;
        Self::from_csv(body.as_ref())
    }

    /// Area for a requester, or the sentinel when unmapped or absent
    pub fn lookup(&self, requester: Option<&str>) -> String {
        requester
            .map(|r| r.trim().to_uppercase())
            .filter(|r| !r.is_empty())
            .and_then(|r| self.by_requester.get(&r).cloned())
            .unwrap_or_else(|| UNASSIGNED_AREA.to_string())
    }

    pub fn len(&self) -> usize {
        self.by_requester.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_requester.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Requester,Area,Notes
jdoe,Operations,first
 ASALAS ,Finance,
,Ghost,skipped
nobody,,skipped
";

    #[test]
    fn test_from_csv_builds_case_insensitive_map() {
        let dir = AreaDirectory::from_csv(CSV.as_bytes()).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.lookup(Some("JDOE")), "Operations");
        assert_eq!(dir.lookup(Some("asalas")), "Finance");
    }

    #[test]
    fn test_unmapped_requester_yields_sentinel() {
        let dir = AreaDirectory::from_csv(CSV.as_bytes()).unwrap();
        assert_eq!(dir.lookup(Some("stranger")), UNASSIGNED_AREA);
        assert_eq!(dir.lookup(None), UNASSIGNED_AREA);
        assert_eq!(dir.lookup(Some("  ")), UNASSIGNED_AREA);
    }

    #[test]
    fn test_missing_columns_is_fatal() {
        let result = AreaDirectory::from_csv("Name,Team\na,b\n".as_bytes());
        assert!(result.is_err());
    }
}
