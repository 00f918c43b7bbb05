use crate::admin::{run_stats, run_watch, StatsArgs, WatchArgs};
use crate::signup::{run_submit, SubmitArgs};
use clap::{Parser, Subcommand};
use waitlist::config::ClientConfig;
use waitlist::error::AppError;
use waitlist::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Waitlist Console",
    about = "Join the waitlist and watch signups from the command line",
    version
)]
struct Cli {
    /// Override the configured Waitlist Service base URL
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one signup to the waitlist
    Submit(SubmitArgs),
    /// Inspect waitlist entries
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Fetch stats once and print the entry table
    Stats(StatsArgs),
    /// Keep the entry table on screen with auto-refresh
    Watch(WatchArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = ClientConfig::load()?;

    if let Some(base) = cli.api_base.as_deref() {
        config.api = config.api.with_base_url(base)?;
    }

    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Submit(args) => run_submit(&config, args).await,
        Command::Admin {
            command: AdminCommand::Stats(args),
        } => run_stats(&config, args).await,
        Command::Admin {
            command: AdminCommand::Watch(args),
        } => run_watch(&config, args).await,
    }
}
