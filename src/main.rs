// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! FleetWatch - replay sensor events and print the fleet's health

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fleetwatch::core::{unix_now, EventBus, Monitor};
use fleetwatch::ingest::JsonLinesSource;
use fleetwatch::presentation::{
    format_local_time, format_relative_time, sorted_log_aggregates, sorted_measurements,
    truncate_subject,
};
use fleetwatch::config::ConfigOrigin;
use fleetwatch::{Config, VERSION};

/// FleetWatch - sensor fleet health monitor
#[derive(Parser, Debug)]
#[command(name = "fleetwatch")]
#[command(version = VERSION)]
#[command(about = "Aggregate sensor measurements and logs into per-sensor health")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Newline-delimited JSON events (stdin if omitted)
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Override the staleness threshold in seconds
    #[arg(long)]
    stale_after: Option<u64>,

    /// Show measurements and logs for one catalogued sensor
    #[arg(long)]
    sensor: Option<String>,

    /// Print the overview as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let (mut config, origin) = Config::open(&config_path)?;
    if let Some(secs) = args.stale_after {
        config.status.stale_after_secs = secs;
    }

    let filter = if args.trace {
        EnvFilter::new("trace")
    } else if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.env_filter())
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("FleetWatch v{}", VERSION);
    match origin {
        ConfigOrigin::Loaded => info!("Configuration loaded from {:?}", config_path),
        ConfigOrigin::Created => info!("Wrote default configuration to {:?}", config_path),
    }
    info!(
        "Stale after {}s, {} catalogued sensors",
        config.status.stale_after_secs,
        config.catalog.entries().len()
    );

    let event_bus = Arc::new(EventBus::new(config.bus.capacity));
    let monitor = Monitor::new(&config, event_bus);

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &args.events {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|e| anyhow!("cannot open {:?}: {}", path, e))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut source = JsonLinesSource::new(reader);

    // A blocked stdin read cannot be cancelled, so stdin replays end on EOF
    // and keep the default Ctrl+C behaviour.
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    if interruptible(&args) {
        let ctrl_c = shutdown_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = ctrl_c.send(());
            }
        });
    }

    let stats = monitor.run(&mut source, shutdown_rx).await?;
    if source.skipped() > 0 {
        warn!("{} input lines could not be decoded", source.skipped());
    }
    info!("{} sensors known after {} events", monitor.known_sensors().len(), stats.measurements + stats.duplicates + stats.logs);
    drop(shutdown_tx);

    let now = unix_now();
    match &args.sensor {
        Some(name) => print_sensor(&monitor, &config, name, now)?,
        None if args.json => {
            println!("{}", serde_json::to_string_pretty(&monitor.overview(now))?);
        }
        None => print_overview(&monitor, now),
    }

    Ok(())
}

/// Whether Ctrl+C should end the replay early instead of killing the process
fn interruptible(args: &Args) -> bool {
    args.events.is_some()
}

fn print_overview(monitor: &Monitor, now: u64) {
    println!("{:<24} {:<8} {:<12} {:<12}", "SENSOR", "STATUS", "LAST DATA", "LAST LOGS");
    for row in monitor.overview(now) {
        println!(
            "{:<24} {:<8} {:<12} {:<12}",
            row.label(),
            row.status,
            format_relative_time(row.last_data, now),
            format_relative_time(row.last_log, now),
        );
    }
}

fn print_sensor(monitor: &Monitor, config: &Config, name: &str, now: u64) -> Result<()> {
    let sensor_id = monitor
        .catalog()
        .lookup(name)
        .cloned()
        .unwrap_or_else(|| name.into());
    let state = monitor.sensor_state(&sensor_id);
    let status = monitor.sensor_status(&sensor_id, now);

    println!("{}", name);
    println!("{:<12}{} ({:?})", "Status:", status, status.color());
    println!("{:<12}{}", "Identifier:", sensor_id);
    println!("{:<12}{}", "Last data:", format_relative_time(state.as_ref().and_then(|s| s.last_data_timestamp()), now));
    println!("{:<12}{}", "Last logs:", format_relative_time(state.as_ref().and_then(|s| s.last_log_timestamp()), now));

    let state = match state {
        Some(state) => state,
        None => return Ok(()),
    };

    println!("\n-- data --");
    for measurement in sorted_measurements(&state) {
        println!(
            "{} ({})",
            format_local_time(measurement.creation_timestamp),
            format_relative_time(Some(measurement.creation_timestamp), now)
        );
        println!("{}", serde_json::to_string_pretty(measurement)?);
    }

    println!("\n-- logs (aggregated) --");
    for log in sorted_log_aggregates(&state) {
        println!(
            "[{}] {} x{}",
            log.severity,
            truncate_subject(&log.subject, config.presentation.subject_max_len),
            log.occurrence_count
        );
        println!(
            "    last occurred {} - {}",
            format_relative_time(Some(log.max_creation_timestamp), now),
            format_local_time(log.max_creation_timestamp)
        );
    }

    Ok(())
}
