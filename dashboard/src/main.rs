use anyhow::Context;
use clap::Parser;
use config::DashboardConfig;
use generator::{build_track, write_location_log, GeneratorConfig};
use log::{info, warn};
use server::DashboardServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use trackcore::auth::Credentials;
use trackcore::dataset::load_dataset;
use trackcore::report::SummaryReport;

mod config;
mod generator;
mod page;
mod server;

#[derive(Parser)]
#[command(author, version, about = "Location-log dashboard server")]
struct Args {
    /// Load dashboard settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Location log CSV to serve
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Write a synthetic location log to this path and exit
    #[arg(long)]
    generate: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 3)]
    days: u32,
    /// Print per-date summaries of the log instead of serving
    #[arg(long, default_value_t = false)]
    offline: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = args.generate {
        let generator = GeneratorConfig {
            days: args.days,
            seed: args.seed,
            ..GeneratorConfig::default()
        };
        let records = build_track(&generator)?;
        write_location_log(&path, &records)?;
        println!("Wrote {} records to {}", records.len(), path.display());
        return Ok(());
    }

    let config = match args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_overrides(args.data, args.bind);

    if args.offline {
        return print_offline_summary(&config);
    }

    match dotenvy::dotenv() {
        Ok(path) => info!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("ignoring unreadable .env file: {}", err),
    }
    let credentials = Credentials::from_env();
    let server = DashboardServer::new(&config, credentials);
    let state = server.state();
    let warm = state.dataset();
    match &warm.error {
        Some(message) => warn!("{}", message),
        None => info!(
            "serving {} records from {}",
            warm.dataset.len(),
            state.cache.path().display()
        ),
    }

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the dashboard server")?;
    runtime.block_on(server.run(async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", err);
        }
    }))
}

fn print_offline_summary(config: &DashboardConfig) -> anyhow::Result<()> {
    let dataset = load_dataset(&config.data_path, &config.timestamp_year)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    println!(
        "Offline summary -> {} records from {}",
        dataset.len(),
        config.data_path.display()
    );
    for date in dataset.available_dates() {
        let summary = SummaryReport::from_records(&dataset.records_on(date));
        let hours: Vec<String> = summary
            .hour_distribution
            .iter()
            .map(|share| format!("{}={}", share.label(), share.count))
            .collect();
        println!(
            "{} points={} zips={} span={}..{} hours=[{}]",
            date,
            summary.total_points,
            summary.unique_zips,
            summary.start_label(),
            summary.end_label(),
            hours.join(" ")
        );
    }
    Ok(())
}
