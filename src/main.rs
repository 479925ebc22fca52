//! sigwatch - watch a signal endpoint and alert on buy/sell.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sigwatch::alert::{AlertStore, AlertStoreExt, FileAlertStore};
use sigwatch::config::Config;
use sigwatch::poller::Password;
use sigwatch::sink::StatusSink;
use sigwatch::state::{JsonFile, LastKnown};
use sigwatch::time::{format_ms, now_ms};
use sigwatch::{AlertPolicy, HttpFetcher, Poller};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Poll a signal endpoint and alert on buy/sell changes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll until interrupted
    Run {
        /// Endpoint URL
        #[arg(long)]
        endpoint: Option<String>,
        /// Basic auth user
        #[arg(long)]
        user: Option<String>,
        /// Basic auth password (prefer SIGWATCH_PASSWORD)
        #[arg(long)]
        password: Option<String>,
        /// Seconds between polls (minimum 5)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Show the last known status and alert state
    Status,
    /// Suppress alerts for a number of minutes
    Snooze {
        minutes: u64,
    },
    /// Lift an active snooze
    Unsnooze,
    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.clone()).context("loading configuration")?;
    let _guard = sigwatch::logging::init_tracing(&config.logging)?;

    match args.command {
        Command::Run {
            endpoint,
            user,
            password,
            interval,
        } => {
            if let Some(endpoint) = endpoint {
                config.poll.endpoint = endpoint;
            }
            if let Some(user) = user {
                config.poll.username = user;
            }
            if let Some(password) = password {
                config.poll.password = Password::new(password);
            }
            if let Some(interval) = interval {
                config.poll.interval_secs = interval;
            }
            run(config).await
        }
        Command::Status => status(&config),
        Command::Snooze { minutes } => {
            let store = FileAlertStore::new(config.alert_state_path());
            let duration = Duration::from_secs(minutes.saturating_mul(60));
            let state = store.snooze_for(duration, now_ms())?;
            println!("Alerts snoozed until {}", format_ms(state.snoozed_until_ms));
            Ok(())
        }
        Command::Unsnooze => {
            FileAlertStore::new(config.alert_state_path()).clear_snooze()?;
            println!("Snooze cleared");
            Ok(())
        }
        Command::Init => {
            let path = Config::default().save(args.config)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

async fn run(config: Config) -> Result<()> {
    info!("Starting sigwatch v{}", env!("CARGO_PKG_VERSION"));

    if config.poll.password.is_empty() {
        warn!("No password configured; set SIGWATCH_PASSWORD or poll.password");
    }

    let store = Arc::new(FileAlertStore::new(config.alert_state_path()));
    let policy = AlertPolicy::new(store)
        .with_cooldown(Duration::from_secs(config.alerts.cooldown_secs));
    info!(cooldown_secs = policy.cooldown().as_secs(), "Alert policy ready");
    let fetcher = Arc::new(HttpFetcher::new()?);

    let (mut poller, events) = Poller::new(fetcher, policy);
    let sink = StatusSink::new(config.snapshot_path(), config.alerts.bell);
    let sink_task = tokio::spawn(sink.run(events));

    poller.start(config.poll.to_poll_config())?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    poller.stop().await?;
    drop(poller);
    sink_task.await?;

    Ok(())
}

fn status(config: &Config) -> Result<()> {
    let last: LastKnown = JsonFile::new(config.snapshot_path()).load()?;
    let alerts = FileAlertStore::new(config.alert_state_path()).get()?;
    let now = now_ms();

    match &last.active {
        Some(run) => println!(
            "Status: on\n  endpoint: {}\n  user: {}\n  every {} seconds",
            run.endpoint, run.username, run.interval_secs
        ),
        None => println!("Status: off"),
    }
    println!(
        "Last response: {}",
        last.last_response.as_deref().unwrap_or("-")
    );
    println!("Last update: {}", format_ms(last.updated_at_ms));
    println!(
        "Last signal: {}",
        alerts
            .last_signal
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Last alert: {}", format_ms(alerts.last_notified_at_ms));
    if alerts.is_snoozed(now) {
        println!("Snoozed until: {}", format_ms(alerts.snoozed_until_ms));
    }

    Ok(())
}
