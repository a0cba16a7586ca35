mod commands;

use anpr_client::ClientError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use commands::access::{CanArgs, TabsCommand};
use commands::dashboard::{FixPlateArgs, LogsArgs};
use commands::notifications::NotificationsArgs;
use commands::prefs::PrefsCommand;
use commands::reports::ReportCommand;
use commands::session::LoginArgs;
use commands::watchlist::WatchlistCommand;

#[derive(Parser, Debug)]
#[command(name = "anpr", version, about = "ANPR monitoring console")]
struct Cli {
    /// Configuration file. Falls back to ANPR_CONFIG, then ./anpr.yaml.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and load the access tree.
    Login(LoginArgs),

    /// Forget the stored session token.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Print the access-control tree.
    Access,

    /// Ask whether a permission is granted, e.g. `anpr can Dashboard vehicle_logs view`.
    Can(CanArgs),

    /// Tab listing, selection and ordering.
    Tabs {
        #[command(subcommand)]
        cmd: TabsCommand,
    },

    /// Vehicle logs from the dashboard.
    Logs(LogsArgs),

    /// Correct the plate read on a log entry.
    FixPlate(FixPlateArgs),

    /// Cameras assigned to the current user.
    Resources,

    /// Watchlist entries.
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommand,
    },

    /// The notification feed.
    Notifications(NotificationsArgs),

    /// Vehicle-log reports.
    Report {
        #[command(subcommand)]
        cmd: ReportCommand,
    },

    /// Local preferences.
    Prefs {
        #[command(subcommand)]
        cmd: PrefsCommand,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let out = commands::Output { json: cli.json };
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Login(args) => commands::session::login(config, args, out).await,
        Command::Logout => commands::session::logout(config),
        Command::Whoami => commands::session::whoami(config, out).await,
        Command::Access => commands::access::show(config, out).await,
        Command::Can(args) => commands::access::can(config, args, out).await,
        Command::Tabs { cmd } => commands::access::tabs(config, cmd, out).await,
        Command::Logs(args) => commands::dashboard::logs(config, args, out).await,
        Command::FixPlate(args) => commands::dashboard::fix_plate(config, args, out).await,
        Command::Resources => commands::dashboard::resources(config, out).await,
        Command::Watchlist { cmd } => commands::watchlist::execute(config, cmd, out).await,
        Command::Notifications(args) => commands::notifications::execute(config, args, out).await,
        Command::Report { cmd } => commands::reports::execute(config, cmd, out).await,
        Command::Prefs { cmd } => commands::prefs::execute(config, cmd, out),
    }
}

/// Print an error: the notice triple for client errors, the chain otherwise.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ClientError>() {
        Some(client) => {
            eprintln!("{}", client.notice());
            if client.is_retryable() {
                eprintln!("  Retry the command to try again.");
            }
        }
        None => eprintln!("Error: {err:#}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            return ExitCode::from(130);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            if matches!(
                err.downcast_ref::<ClientError>(),
                Some(ClientError::SessionExpired | ClientError::NotAuthenticated)
            ) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
