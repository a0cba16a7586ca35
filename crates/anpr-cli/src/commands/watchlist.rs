//! `anpr watchlist`.

use super::{Output, or_dash};
use anpr_core::{AnprConfig, ListType, WatchlistEntry};
use anpr_policy::WatchlistForm;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum WatchlistCommand {
    /// List watchlisted plates.
    List,

    /// Add a plate.
    Add(EntryArgs),

    /// Update an existing entry.
    Update {
        /// Entry id.
        id: i64,
        #[command(flatten)]
        entry: EntryArgs,
    },
}

#[derive(Debug, Args)]
pub struct EntryArgs {
    /// Vehicle number.
    pub vehicle_number: String,

    /// blacklisted or whitelisted.
    #[arg(long = "list", default_value = "blacklisted")]
    pub list_type: ListType,

    /// Why the plate is listed (3 to 500 characters).
    #[arg(long)]
    pub reason: String,
}

impl EntryArgs {
    fn form(&self) -> WatchlistForm {
        WatchlistForm::new(&self.vehicle_number, self.list_type, &self.reason)
    }
}

fn print_entry(entry: &WatchlistEntry) {
    println!(
        "{:>6}  {:<14} {:<12} {}",
        entry.id,
        entry.vehicle_number,
        entry.list_type,
        or_dash(entry.reason.as_deref())
    );
}

pub async fn execute(config: AnprConfig, cmd: WatchlistCommand, out: Output) -> Result<()> {
    let (ctx, _) = super::restore(config).await?;

    match cmd {
        WatchlistCommand::List => {
            let entries = ctx.watchlist().await?;
            out.emit(&entries, |entries| {
                if entries.is_empty() {
                    println!("Watchlist is empty");
                }
                entries.iter().for_each(print_entry);
            })
        }
        WatchlistCommand::Add(entry) => {
            let created = ctx.add_watchlist(entry.form()).await?;
            out.emit(&created, |created| {
                println!("✔ Added to watchlist");
                print_entry(created);
            })
        }
        WatchlistCommand::Update { id, entry } => {
            let updated = ctx.update_watchlist(id, entry.form()).await?;
            out.emit(&updated, |updated| {
                println!("✔ Watchlist entry updated");
                print_entry(updated);
            })
        }
    }
}
