//! Command implementations for the `anpr` console.

pub mod access;
pub mod dashboard;
pub mod notifications;
pub mod prefs;
pub mod reports;
pub mod session;
pub mod watchlist;

use anpr_client::{AccessSnapshot, AppContext, ClientError};
use anpr_core::AnprConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// How results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as JSON when requested, else run `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

/// Load and validate configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<AnprConfig> {
    let config = AnprConfig::load(explicit).context("Failed to load configuration")?;
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

/// Open local storage without touching the network.
pub fn open(config: AnprConfig) -> Result<AppContext> {
    let storage = config.storage.file_path();
    AppContext::open(config)
        .with_context(|| format!("Failed to open local storage at {}", storage.display()))
}

/// Open local storage and resume the stored session.
pub async fn restore(config: AnprConfig) -> Result<(AppContext, Arc<AccessSnapshot>)> {
    let ctx = open(config)?;
    let snapshot = ctx
        .restore()
        .await?
        .ok_or(ClientError::NotAuthenticated)?;
    Ok((ctx, snapshot))
}

/// Render an optional field for table output.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("Gate 1")), "Gate 1");
    }
}
