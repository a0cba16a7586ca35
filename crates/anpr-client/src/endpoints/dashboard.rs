//! Dashboard endpoints: vehicle logs and plate corrections.

use crate::api::ApiClient;
use crate::error::ClientError;
use anpr_core::{Acknowledgement, FilterLimits, FilterScope, Page, VehicleLog};
use anpr_policy::validation::{normalize_plate_search, normalize_vehicle_number};
use anpr_policy::{DateRange, PageRequest, ValidationError};
use chrono::NaiveDate;
use serde::Serialize;

/// Raw log filter as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`, inclusive.
    pub end_date: String,
    /// Partial plate to search for.
    pub vehicle_number: Option<String>,
    /// Restrict to these cameras; empty means all assigned cameras.
    pub camera_ids: Vec<i64>,
    pub page: u32,
    pub page_size: u32,
}

impl LogFilter {
    pub fn new(start_date: &str, end_date: &str) -> Self {
        Self {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            vehicle_number: None,
            camera_ids: Vec::new(),
            page: 1,
            page_size: 50,
        }
    }

    /// Check the filter against the limit for `scope`.
    pub fn validate(
        &self,
        scope: FilterScope,
        limits: &FilterLimits,
    ) -> Result<LogQuery, ValidationError> {
        let range = DateRange::parse(&self.start_date, &self.end_date, scope, limits)?;
        let page = PageRequest::validated(self.page, self.page_size)?;

        Ok(LogQuery {
            start_date: range.start,
            end_date: range.end,
            vehicle_number: self
                .vehicle_number
                .as_deref()
                .and_then(normalize_plate_search),
            camera_ids: self.camera_ids.clone(),
            page: page.page,
            page_size: page.page_size,
        })
    }
}

/// Validated body for the vehicle-log and report endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub camera_ids: Vec<i64>,
    pub page: u32,
    pub page_size: u32,
}

/// Body for `POST /dashboard/fix-vehicle-number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixVehicleNumber {
    pub log_id: i64,
    pub vehicle_number: String,
}

impl FixVehicleNumber {
    /// Normalize the corrected plate.
    pub fn new(log_id: i64, vehicle_number: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            log_id,
            vehicle_number: normalize_vehicle_number(vehicle_number)?,
        })
    }
}

impl ApiClient {
    /// `POST /dashboard/vehicle-logs`.
    pub async fn vehicle_logs(&self, query: &LogQuery) -> Result<Page<VehicleLog>, ClientError> {
        self.post("/dashboard/vehicle-logs", query).await
    }

    /// `POST /dashboard/fix-vehicle-number`.
    pub async fn fix_vehicle_number(
        &self,
        fix: &FixVehicleNumber,
    ) -> Result<Acknowledgement, ClientError> {
        self.post("/dashboard/fix-vehicle-number", fix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anpr_policy::ValidationErrorKind;

    /// Test that a valid filter serializes with ISO dates and drops empty fields.
    #[test]
    fn test_query_body() {
        let mut filter = LogFilter::new("2024-03-01", "2024-03-10");
        filter.vehicle_number = Some(" ka01 ".to_string());
        let query = filter
            .validate(FilterScope::Dashboard, &FilterLimits::default())
            .unwrap();

        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["start_date"], "2024-03-01");
        assert_eq!(body["end_date"], "2024-03-10");
        assert_eq!(body["vehicle_number"], "KA01");
        assert!(body.get("camera_ids").is_none());
        assert_eq!(body["page"], 1);
    }

    /// Test that the dashboard and report limits differ.
    #[test]
    fn test_scope_limits() {
        let filter = LogFilter::new("2024-01-01", "2024-02-15");
        let limits = FilterLimits::default();

        let err = filter.validate(FilterScope::Dashboard, &limits).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DateRangeTooLong);
        assert_eq!(err.message, "Date range cannot exceed 30 days.");
        assert!(filter.validate(FilterScope::Reports, &limits).is_ok());
    }

    #[test]
    fn test_fix_normalizes_plate() {
        let fix = FixVehicleNumber::new(7, "ka-01 ab 1234").unwrap();
        assert_eq!(fix.vehicle_number, "KA01AB1234");
        assert!(FixVehicleNumber::new(7, "  ").is_err());
    }
}
