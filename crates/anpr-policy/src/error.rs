//! Error types for policy checks and form validation.

use std::fmt;

/// Error returned when user input fails validation.
///
/// The message is the exact text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Field the error refers to, when there is one.
    pub field: Option<String>,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    /// Attach the offending field name.
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // =========================================================================
    // REQUIRED FIELDS
    // =========================================================================

    /// A required field was blank.
    pub fn required(field: &str) -> Self {
        Self::new(
            ValidationErrorKind::RequiredField,
            format!("{} is required.", field_label(field)),
        )
        .on_field(field)
    }

    // =========================================================================
    // DATE RANGES
    // =========================================================================

    /// Start date is after end date.
    pub fn start_after_end() -> Self {
        Self::new(
            ValidationErrorKind::InvalidDateRange,
            "Start date cannot be after end date.",
        )
        .on_field("start_date")
    }

    /// The range spans too many days.
    pub fn range_too_long(max_days: u32) -> Self {
        Self::new(
            ValidationErrorKind::DateRangeTooLong,
            format!("Date range cannot exceed {} days.", max_days),
        )
        .on_field("end_date")
    }

    /// A date could not be parsed.
    pub fn invalid_date(field: &str, raw: &str) -> Self {
        Self::new(
            ValidationErrorKind::InvalidField,
            format!(
                "{} '{}' is not a valid date (expected YYYY-MM-DD).",
                field_label(field),
                raw
            ),
        )
        .on_field(field)
    }

    // =========================================================================
    // VEHICLE NUMBERS
    // =========================================================================

    /// Plate does not look like a vehicle number.
    pub fn invalid_vehicle_number(raw: &str) -> Self {
        Self::new(
            ValidationErrorKind::InvalidVehicleNumber,
            format!(
                "'{}' is not a valid vehicle number (4-15 letters and digits).",
                raw.trim()
            ),
        )
        .on_field("vehicle_number")
    }

    /// A field failed a generic check.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidField, message).on_field(field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    RequiredField,
    InvalidDateRange,
    DateRangeTooLong,
    InvalidVehicleNumber,
    InvalidField,
}

/// `vehicle_number` -> `Vehicle number`.
fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A gated operation the current user is not permitted to perform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not permitted: {permission} on '{component}' in tab '{tab}'")]
pub struct AccessDenied {
    pub tab: String,
    pub component: String,
    pub permission: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_message_uses_field_label() {
        let err = ValidationError::required("vehicle_number");
        assert_eq!(err.message, "Vehicle number is required.");
        assert_eq!(err.field.as_deref(), Some("vehicle_number"));
    }

    #[test]
    fn range_messages() {
        assert_eq!(
            ValidationError::start_after_end().to_string(),
            "Start date cannot be after end date."
        );
        assert_eq!(
            ValidationError::range_too_long(90).to_string(),
            "Date range cannot exceed 90 days."
        );
    }
}
