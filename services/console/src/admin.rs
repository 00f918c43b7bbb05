use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use waitlist::admin::{AdminDashboard, FetchMode, PollingSession};
use waitlist::config::ClientConfig;
use waitlist::error::AppError;
use waitlist::http::{HttpClient, ReqwestTransport};

use crate::terminal::print_dashboard;

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// Case-insensitive email substring
    #[arg(long, default_value = "")]
    filter: String,
    /// Print the snapshot as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WatchArgs {
    #[arg(long, default_value = "")]
    filter: String,
    /// Override the configured auto-refresh interval
    #[arg(long)]
    interval_secs: Option<u64>,
}

fn dashboard_for(config: &ClientConfig) -> Result<Arc<AdminDashboard<ReqwestTransport>>, AppError> {
    let transport = ReqwestTransport::new(config.api.base_url.clone())?;
    let client = Arc::new(HttpClient::new(transport));
    Ok(Arc::new(AdminDashboard::new(client, config.api.admin_timeout)))
}

pub(crate) async fn run_stats(config: &ClientConfig, args: StatsArgs) -> Result<(), AppError> {
    let dashboard = dashboard_for(config)?;
    let result = dashboard.refresh(FetchMode::Manual).await;

    if args.json {
        let snapshot = result?;
        serde_json::to_writer_pretty(std::io::stdout().lock(), snapshot.as_ref())
            .map_err(std::io::Error::from)?;
        println!();
        return Ok(());
    }

    print_dashboard(&dashboard.state(), &args.filter, false);
    result?;
    Ok(())
}

enum WatchCommand {
    Refresh,
    ToggleAuto,
    Filter(String),
    Interval(Duration),
    Quit,
    Help,
}

fn parse_command(line: &str) -> Option<WatchCommand> {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    match head {
        "r" | "refresh" => Some(WatchCommand::Refresh),
        "a" | "auto" => Some(WatchCommand::ToggleAuto),
        "f" | "filter" => Some(WatchCommand::Filter(rest.trim().to_string())),
        "i" | "interval" => rest
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(|secs| WatchCommand::Interval(Duration::from_secs(secs))),
        "q" | "quit" | "exit" => Some(WatchCommand::Quit),
        "?" | "h" | "help" => Some(WatchCommand::Help),
        _ => None,
    }
}

const WATCH_HELP: &str =
    "commands: r (refresh) | a (toggle auto-refresh) | f <text> (filter) | i <secs> (interval) | q (quit)";

pub(crate) async fn run_watch(config: &ClientConfig, args: WatchArgs) -> Result<(), AppError> {
    let dashboard = dashboard_for(config)?;
    let interval = args
        .interval_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(config.polling.interval);
    let mut filter = args.filter;
    let mut changes = dashboard.subscribe();

    if let Err(err) = dashboard.refresh(FetchMode::Manual).await {
        debug!(error = %err, "initial load failed");
    }
    let mut polling = PollingSession::launch(Arc::clone(&dashboard), interval);
    info!(?interval, "watching waitlist");

    changes.borrow_and_update();
    print_dashboard(&dashboard.state(), &filter, polling.is_enabled());
    println!("{WATCH_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                changes.borrow_and_update();
                let state = dashboard.state();
                if !state.busy {
                    print_dashboard(&state, &filter, polling.is_enabled());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Some(WatchCommand::Refresh) => {
                        if let Err(err) = dashboard.refresh(FetchMode::Manual).await {
                            debug!(error = %err, "manual refresh failed");
                        }
                    }
                    Some(WatchCommand::ToggleAuto) => {
                        let enabled = polling.toggle();
                        println!("auto-refresh {}", if enabled { "on" } else { "off" });
                    }
                    Some(WatchCommand::Filter(text)) => {
                        filter = text;
                        print_dashboard(&dashboard.state(), &filter, polling.is_enabled());
                    }
                    Some(WatchCommand::Interval(period)) => {
                        polling.set_interval(period);
                        println!("auto-refresh every {}s", period.as_secs());
                    }
                    Some(WatchCommand::Quit) => break,
                    Some(WatchCommand::Help) | None => println!("{WATCH_HELP}"),
                }
            }
        }
    }

    polling.stop();
    Ok(())
}
