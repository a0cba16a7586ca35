//! Report endpoint and file export.

use crate::api::ApiClient;
use crate::endpoints::dashboard::LogQuery;
use crate::error::ClientError;
use anpr_core::{Page, VehicleLog};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Upper bound on pages fetched for one export.
const MAX_EXPORT_PAGES: u64 = 200;

/// File format for report exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
        }
    }

    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            other => Err(format!("unsupported report format '{other}' (expected json or yaml)")),
        }
    }
}

/// Rows fetched for an export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRows {
    pub rows: Vec<VehicleLog>,
    /// Row count the server reported for the whole query.
    pub server_total: u64,
}

/// Report rows with the filter that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportExport {
    pub generated_at: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    /// Rows matching the query on the server.
    pub total: u64,
    /// Rows written to this export.
    pub exported: u64,
    /// Set when `exported` is short of `total`.
    pub truncated: bool,
    pub rows: Vec<VehicleLog>,
}

impl ReportExport {
    pub fn new(query: &LogQuery, fetched: ReportRows) -> Self {
        let exported = fetched.rows.len() as u64;
        let total = fetched.server_total.max(exported);
        Self {
            generated_at: Utc::now(),
            start_date: query.start_date,
            end_date: query.end_date,
            vehicle_number: query.vehicle_number.clone(),
            total,
            exported,
            truncated: exported < total,
            rows: fetched.rows,
        }
    }

    /// Serialize in the given format.
    pub fn render(&self, format: ReportFormat) -> Result<String, ClientError> {
        match format {
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| ClientError::Export(e.to_string()))
            }
            ReportFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| ClientError::Export(e.to_string()))
            }
        }
    }

    /// Write to `path`.
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> Result<(), ClientError> {
        let content = self.render(format)?;
        fs::write(path, content)
            .map_err(|e| ClientError::Export(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), %format, "Report exported");
        Ok(())
    }
}

impl ApiClient {
    /// `POST /reports/vehicle-logs`.
    pub async fn report(&self, query: &LogQuery) -> Result<Page<VehicleLog>, ClientError> {
        self.post("/reports/vehicle-logs", query).await
    }

    /// Rows matching `query`, starting at page 1 and stopping after
    /// `MAX_EXPORT_PAGES` pages.
    pub async fn report_rows(&self, query: &LogQuery) -> Result<ReportRows, ClientError> {
        let mut query = query.clone();
        query.page = 1;
        let mut fetched = ReportRows::default();

        loop {
            let page = self.report(&query).await?;
            let count = page.items.len();
            let page_count = page.page_count();
            fetched.server_total = fetched.server_total.max(page.total);
            fetched.rows.extend(page.items);

            if count == 0 || u64::from(query.page) >= page_count {
                break;
            }
            if u64::from(query.page) >= MAX_EXPORT_PAGES {
                tracing::warn!(
                    pages = MAX_EXPORT_PAGES,
                    fetched = fetched.rows.len(),
                    server_total = fetched.server_total,
                    "Report export hit the page limit; remaining rows not exported"
                );
                break;
            }
            query.page += 1;
        }

        tracing::debug!(
            rows = fetched.rows.len(),
            server_total = fetched.server_total,
            "Fetched report rows"
        );
        Ok(fetched)
    }
}
