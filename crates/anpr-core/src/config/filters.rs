//! Date-range limits applied to filter forms.

use serde::{Deserialize, Serialize};

/// Which screen a date-range filter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterScope {
    /// Live dashboard vehicle logs.
    Dashboard,
    /// Historical reports.
    Reports,
}

/// Maximum span, in days, a filter may cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterLimits {
    #[serde(default = "default_dashboard_max_days")]
    pub dashboard_max_days: u32,

    #[serde(default = "default_report_max_days")]
    pub report_max_days: u32,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            dashboard_max_days: default_dashboard_max_days(),
            report_max_days: default_report_max_days(),
        }
    }
}

impl FilterLimits {
    /// Limit for the given scope.
    pub fn max_days(&self, scope: FilterScope) -> u32 {
        match scope {
            FilterScope::Dashboard => self.dashboard_max_days,
            FilterScope::Reports => self.report_max_days,
        }
    }
}

fn default_dashboard_max_days() -> u32 {
    30
}

fn default_report_max_days() -> u32 {
    90
}
