//! `anpr notifications`.

use super::{Output, or_dash};
use anpr_client::NotificationQuery;
use anpr_core::AnprConfig;
use anyhow::Result;
use clap::Args;

/// Arguments for `anpr notifications`.
#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Notifications per page.
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,

    /// Only unread notifications.
    #[arg(long, default_value_t = false)]
    pub unread: bool,
}

pub async fn execute(config: AnprConfig, args: NotificationsArgs, out: Output) -> Result<()> {
    let (ctx, _) = super::restore(config).await?;
    let query = NotificationQuery {
        page: args.page,
        page_size: args.page_size,
        unread_only: args.unread,
    };

    let feed = ctx.notifications(&query).await?;
    out.emit(&feed, |feed| {
        println!("{} unread of {}", feed.unread_count, feed.total);
        for n in &feed.notifications {
            let marker = if n.is_read { " " } else { "•" };
            println!(
                "{marker} {:<24} {:<20} {}",
                or_dash(n.created_at.as_deref()),
                n.title,
                n.message
            );
        }
    })
}
