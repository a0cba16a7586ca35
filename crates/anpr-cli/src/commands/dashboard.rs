//! `anpr logs`, `anpr fix-plate` and `anpr resources`.

use super::{Output, or_dash};
use anpr_client::LogFilter;
use anpr_core::{AnprConfig, Page, VehicleLog};
use anyhow::Result;
use clap::Args;

/// Date and plate filters shared by `logs` and `report`.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Start date, YYYY-MM-DD.
    #[arg(long)]
    pub from: String,

    /// End date, YYYY-MM-DD (inclusive).
    #[arg(long)]
    pub to: String,

    /// Partial plate to search for.
    #[arg(long)]
    pub plate: Option<String>,

    /// Restrict to a camera; repeat for several.
    #[arg(long = "camera")]
    pub cameras: Vec<i64>,

    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page. Defaults to `display.page_size`.
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl FilterArgs {
    pub fn to_filter(&self, config: &AnprConfig) -> LogFilter {
        LogFilter {
            start_date: self.from.clone(),
            end_date: self.to.clone(),
            vehicle_number: self.plate.clone(),
            camera_ids: self.cameras.clone(),
            page: self.page,
            page_size: self.page_size.unwrap_or(config.display.page_size),
        }
    }
}

/// Arguments for `anpr logs`.
#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for `anpr fix-plate`.
#[derive(Debug, Args)]
pub struct FixPlateArgs {
    /// Log entry id.
    pub log_id: i64,
    /// Corrected vehicle number.
    pub vehicle_number: String,
}

/// Print a page of plate reads.
pub fn print_logs(page: &Page<VehicleLog>) {
    for log in &page.items {
        println!(
            "{:>8}  {:<14} {:<22} {:<16} {}",
            log.id,
            log.vehicle_number,
            log.captured_at,
            or_dash(log.camera_name.as_deref()),
            log.watchlist_status
                .map(|s| s.to_string())
                .unwrap_or_default()
        );
    }
    println!(
        "Page {} of {} ({} rows)",
        page.page,
        page.page_count().max(1),
        page.total
    );
}

pub async fn logs(config: AnprConfig, args: LogsArgs, out: Output) -> Result<()> {
    let filter = args.filter.to_filter(&config);
    let (ctx, _) = super::restore(config).await?;
    let page = ctx.vehicle_logs(&filter).await?;
    out.emit(&page, print_logs)
}

pub async fn fix_plate(config: AnprConfig, args: FixPlateArgs, out: Output) -> Result<()> {
    let (ctx, _) = super::restore(config).await?;
    let ack = ctx
        .fix_vehicle_number(args.log_id, &args.vehicle_number)
        .await?;
    out.emit(&ack, |ack| {
        println!(
            "✔ {}",
            ack.message.as_deref().unwrap_or("Vehicle number updated")
        );
    })
}

pub async fn resources(config: AnprConfig, out: Output) -> Result<()> {
    let (ctx, _) = super::restore(config).await?;
    let resources = ctx.assigned_resources().await?;
    out.emit(&resources, |resources| {
        if resources.resources.is_empty() {
            println!("No cameras assigned");
        }
        for camera in &resources.resources {
            println!(
                "{:>6}  {:<20} {:<20} {}",
                camera.id,
                camera.name,
                or_dash(camera.location.as_deref()),
                or_dash(camera.status.as_deref())
            );
        }
    })
}
