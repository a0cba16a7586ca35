//! `anpr report show` and `anpr report export`.

use super::Output;
use super::dashboard::{FilterArgs, print_logs};
use anpr_client::ReportFormat;
use anpr_core::AnprConfig;
use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Show one page of the vehicle-log report.
    Show {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Write every matching row to a file.
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file.
        #[arg(short, long)]
        output: PathBuf,

        /// json or yaml. Defaults to the output file extension.
        #[arg(long)]
        format: Option<ReportFormat>,
    },
}

pub async fn execute(config: AnprConfig, cmd: ReportCommand, out: Output) -> Result<()> {
    match cmd {
        ReportCommand::Show { filter } => {
            let filter = filter.to_filter(&config);
            let (ctx, _) = super::restore(config).await?;
            let page = ctx.report(&filter).await?;
            out.emit(&page, print_logs)
        }
        ReportCommand::Export {
            filter,
            output,
            format,
        } => {
            let filter = filter.to_filter(&config);
            let (ctx, _) = super::restore(config).await?;
            let export = ctx.export_report(&filter, &output, format).await?;

            let summary = json!({
                "path": output.display().to_string(),
                "rows": export.exported,
                "total": export.total,
                "truncated": export.truncated,
            });
            out.emit(&summary, |_| {
                println!("✔ Exported {} rows to {}", export.exported, output.display());
                if export.truncated {
                    println!(
                        "  {} of {} matching rows were not exported; narrow the filter.",
                        export.total - export.exported,
                        export.total
                    );
                }
            })
        }
    }
}
