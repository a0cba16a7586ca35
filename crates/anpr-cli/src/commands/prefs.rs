//! `anpr prefs`.

use super::Output;
use anpr_core::AnprConfig;
use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Show or change the dark-mode preference.
    DarkMode {
        /// on or off. Omit to show the current value.
        #[arg(value_parser = parse_switch)]
        value: Option<bool>,
    },
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected on or off, got '{other}'")),
    }
}

pub fn execute(config: AnprConfig, cmd: PrefsCommand, out: Output) -> Result<()> {
    let ctx = super::open(config)?;

    match cmd {
        PrefsCommand::DarkMode { value } => {
            if let Some(enabled) = value {
                ctx.set_dark_mode(enabled)?;
            }
            let enabled = ctx.dark_mode();
            out.emit(&json!({ "dark_mode": enabled }), |_| {
                println!("Dark mode: {}", if enabled { "on" } else { "off" });
            })
        }
    }
}
