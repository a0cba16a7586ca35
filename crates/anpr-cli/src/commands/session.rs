//! `anpr login`, `anpr logout` and `anpr whoami`.

use super::{Output, or_dash};
use anpr_core::AnprConfig;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::io::{self, BufRead};

/// Arguments for `anpr login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (or ANPR_USERNAME).
    #[arg(short, long, env = "ANPR_USERNAME")]
    pub username: String,

    /// Password (or ANPR_PASSWORD). Read from stdin when omitted.
    #[arg(short, long, env = "ANPR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(config: AnprConfig, args: LoginArgs, out: Output) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password()?,
    };

    let ctx = super::open(config)?;
    let snapshot = ctx.login(&args.username, &password).await?;
    let active = ctx.active_tab()?;

    let summary = json!({
        "user": snapshot.user,
        "tabs": snapshot.tabs().iter().map(|t| t.tab_name.as_str()).collect::<Vec<_>>(),
        "active_tab": active.as_ref().map(|t| t.as_str()),
    });
    out.emit(&summary, |_| {
        println!("✔ Logged in as {}", snapshot.user.display_name());
        if let Some(tab) = &active {
            println!("  Active tab: {tab}");
        }
    })
}

pub fn logout(config: AnprConfig) -> Result<()> {
    let ctx = super::open(config)?;
    ctx.logout()?;
    println!("✔ Logged out");
    Ok(())
}

pub async fn whoami(config: AnprConfig, out: Output) -> Result<()> {
    let (_, snapshot) = super::restore(config).await?;
    let user = &snapshot.user;
    out.emit(user, |user| {
        println!("{} ({})", user.display_name(), user.username);
        println!("  Id:    {}", user.id);
        println!("  Role:  {}", or_dash(user.role.as_deref()));
        println!("  Email: {}", or_dash(user.email.as_deref()));
    })
}
