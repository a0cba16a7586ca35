//! `anpr access`, `anpr can` and `anpr tabs`.

use super::Output;
use anpr_core::{AnprConfig, Tab, TabName};
use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

/// Arguments for `anpr can`.
#[derive(Debug, Args)]
pub struct CanArgs {
    /// Tab name, e.g. "Dashboard".
    pub tab: String,
    /// Component code, e.g. "vehicle_logs".
    pub component: String,
    /// Permission: view, add, update, export or any other flag name.
    pub permission: String,
}

#[derive(Debug, Subcommand)]
pub enum TabsCommand {
    /// List tabs in display order.
    List,

    /// Select the active tab.
    Activate {
        /// Tab name.
        tab: String,
    },

    /// Custom tab order for the current user.
    Order {
        #[command(subcommand)]
        cmd: OrderCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Move a tab to a zero-based position.
    Set {
        /// Tab name.
        tab: String,
        /// New position, 0 is first.
        position: usize,
    },

    /// Go back to the server order.
    Reset,
}

pub async fn show(config: AnprConfig, out: Output) -> Result<()> {
    let (_, snapshot) = super::restore(config).await?;
    out.emit(&snapshot.access, |access| {
        for tab in &access.tabs {
            let note = if tab.grants_all() {
                " (no components configured: all granted)"
            } else {
                ""
            };
            println!("{} [#{}, order {}]{note}", tab.tab_name, tab.tab_id, tab.display_order);
            for component in &tab.components {
                let granted = component.permissions.granted();
                println!(
                    "  - {} ({}): {}",
                    component.component_code,
                    component.component_name,
                    if granted.is_empty() {
                        "none".to_string()
                    } else {
                        granted.join(", ")
                    }
                );
            }
        }
    })
}

pub async fn can(config: AnprConfig, args: CanArgs, out: Output) -> Result<()> {
    let (_, snapshot) = super::restore(config).await?;
    let granted = snapshot
        .policy()
        .can_view_str(&args.tab, &args.component, &args.permission);

    let result = json!({
        "tab": args.tab,
        "component": args.component,
        "permission": args.permission,
        "granted": granted,
    });
    out.emit(&result, |_| {
        println!("{}", if granted { "granted" } else { "denied" });
    })
}

fn print_tabs(tabs: &[Tab], active: Option<&TabName>) {
    for (index, tab) in tabs.iter().enumerate() {
        let marker = if Some(&tab.tab_name) == active { "*" } else { " " };
        println!("{marker} {index}. {}", tab.tab_name);
    }
}

pub async fn tabs(config: AnprConfig, cmd: TabsCommand, out: Output) -> Result<()> {
    let (ctx, _) = super::restore(config).await?;

    let tabs = match cmd {
        TabsCommand::List => ctx.ordered_tabs()?,
        TabsCommand::Activate { tab } => {
            let selected = ctx.set_active_tab(&TabName::parse(&tab))?;
            if !out.json {
                println!("✔ Active tab: {selected}");
            }
            ctx.ordered_tabs()?
        }
        TabsCommand::Order { cmd } => match cmd {
            OrderCommand::Set { tab, position } => ctx.move_tab(&TabName::parse(&tab), position)?,
            OrderCommand::Reset => ctx.reset_tab_order()?,
        },
    };

    let active = ctx.active_tab()?;
    let listing = json!({
        "tabs": tabs.iter().map(|t| t.tab_name.as_str()).collect::<Vec<_>>(),
        "active_tab": active.as_ref().map(|t| t.as_str()),
    });
    out.emit(&listing, |_| print_tabs(&tabs, active.as_ref()))
}
