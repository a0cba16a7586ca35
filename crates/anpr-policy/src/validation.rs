//! Form validation shared by every screen.
//!
//! Date ranges, required fields, vehicle numbers, watchlist forms and
//! pagination all go through this module, so the dashboard, report and
//! watchlist flows apply identical rules and messages. Validation runs
//! before any request is built.

use anpr_core::{FilterLimits, FilterScope, ListType};
use chrono::NaiveDate;
use validator::Validate;

use crate::error::ValidationError;

/// Accepted date input format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const PLATE_MIN_LEN: usize = 4;
const PLATE_MAX_LEN: usize = 15;

/// A validated, inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Validate a range against a maximum span.
    ///
    /// The span is `end - start` in whole days and must stay below
    /// `max_days`.
    pub fn new(start: NaiveDate, end: NaiveDate, max_days: u32) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::start_after_end());
        }
        let range = Self { start, end };
        if range.span_days() >= i64::from(max_days) {
            return Err(ValidationError::range_too_long(max_days));
        }
        Ok(range)
    }

    /// Validate with the limit configured for a screen.
    pub fn for_scope(
        start: NaiveDate,
        end: NaiveDate,
        scope: FilterScope,
        limits: &FilterLimits,
    ) -> Result<Self, ValidationError> {
        Self::new(start, end, limits.max_days(scope))
    }

    /// Parse `YYYY-MM-DD` inputs, then validate.
    pub fn parse(
        start: &str,
        end: &str,
        scope: FilterScope,
        limits: &FilterLimits,
    ) -> Result<Self, ValidationError> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::for_scope(start, end, scope, limits)
    }

    /// `end - start` in whole days.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Parse a required `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = require(field, raw)?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_date(field, raw))
}

/// Reject blank input; returns the trimmed value.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(trimmed)
}

/// Uppercase a plate, drop spaces and dashes, and check its shape.
pub fn normalize_vehicle_number(raw: &str) -> Result<String, ValidationError> {
    require("vehicle_number", raw)?;
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let valid_shape = normalized.chars().all(|c| c.is_ascii_alphanumeric())
        && (PLATE_MIN_LEN..=PLATE_MAX_LEN).contains(&normalized.len());
    if !valid_shape {
        return Err(ValidationError::invalid_vehicle_number(raw));
    }
    Ok(normalized)
}

/// Plate search text: trimmed and uppercased, partial plates allowed.
pub fn normalize_plate_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_ascii_uppercase())
}

/// Convert derive-based field errors into the crate's error, picking the
/// first failing field in name order so the message is deterministic.
fn from_field_errors(errors: validator::ValidationErrors) -> ValidationError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields.into_iter().next() {
        Some((field, errs)) => {
            let field = field.to_string();
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid.", field));
            ValidationError::invalid_field(&field, message)
        }
        None => ValidationError::invalid_field("form", "Form is invalid."),
    }
}

/// Add or update a watchlist entry.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct WatchlistForm {
    pub vehicle_number: String,

    pub list_type: ListType,

    #[validate(length(min = 3, max = 500, message = "Reason must be between 3 and 500 characters."))]
    pub reason: String,
}

impl WatchlistForm {
    pub fn new(vehicle_number: &str, list_type: ListType, reason: &str) -> Self {
        Self {
            vehicle_number: vehicle_number.to_string(),
            list_type,
            reason: reason.to_string(),
        }
    }

    /// Normalize and validate, returning the form ready to send.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let vehicle_number = normalize_vehicle_number(&self.vehicle_number)?;
        let reason = require("reason", &self.reason)?.to_string();

        let form = Self {
            vehicle_number,
            list_type: self.list_type,
            reason,
        };
        form.validate().map_err(from_field_errors)?;
        Ok(form)
    }
}

/// Pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct PageRequest {
    #[validate(range(min = 1, message = "Page must be at least 1."))]
    pub page: u32,

    #[validate(range(min = 1, max = 500, message = "Page size must be between 1 and 500."))]
    pub page_size: u32,
}

impl PageRequest {
    pub fn validated(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        let request = Self { page, page_size };
        request.validate().map_err(from_field_errors)?;
        Ok(request)
    }
}

/// Check login inputs are present; returns the trimmed username.
pub fn validate_login<'a>(username: &'a str, password: &str) -> Result<&'a str, ValidationError> {
    let username = require("username", username)?;
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    Ok(username)
}
