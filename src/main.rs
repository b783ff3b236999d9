use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use mention_watch::aggregator::{platform_distribution, topic_distribution};
use mention_watch::config::{Config, SourceConfig};
use mention_watch::error::ConfigError;
use mention_watch::events::{Alert, Severity};
use mention_watch::sources;
use mention_watch::MonitoringController;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};

/// Command-line arguments for the mention monitor
#[derive(Parser)]
#[command(
    name = "mention-watch",
    about = "Brand mention monitor - live sentiment, topic and anomaly tracking",
    long_about = "Streams brand mentions from a synthetic generator or a JSON lines feed, \
                  classifies their sentiment and topic, keeps rolling statistics and raises \
                  alerts on volume, sentiment, platform and topic anomalies."
)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Configuration file path (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(
        short,
        long,
        help = "Enable verbose logging output (sets RUST_LOG=debug)"
    )]
    verbose: bool,

    /// Stop after this many ingested mentions
    #[arg(short, long, value_name = "N")]
    ticks: Option<u64>,

    /// Seed for the synthetic source
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Print the final mentions, alerts and statistics as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Validate the CLI arguments
    ///
    /// # Returns
    ///
    /// `Ok(())` if all arguments are valid, `Err(String)` with error message otherwise
    fn validate(&self) -> Result<(), String> {
        if let Some(ref config_path) = self.config {
            // missing files fall back to defaults in load_config
            if config_path.exists() {
                if !config_path.is_file() {
                    return Err(format!(
                        "Configuration path is not a file: {}",
                        config_path.display()
                    ));
                }

                if let Some(extension) = config_path.extension() {
                    if extension != "toml" {
                        warn!(
                            "Configuration file does not have .toml extension: {}",
                            config_path.display()
                        );
                    }
                }
            }
        }

        if self.ticks == Some(0) {
            return Err("--ticks must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Convert config path to string safely, handling non-UTF-8 paths
    fn config_path_str(&self) -> Result<Option<&str>, String> {
        match &self.config {
            Some(path) => match path.to_str() {
                Some(path_str) => Ok(Some(path_str)),
                None => Err(format!(
                    "Configuration file path contains invalid UTF-8 characters: {}",
                    path.display()
                )),
            },
            None => Ok(None),
        }
    }
}

/// Load configuration from file or use defaults
///
/// Missing, unreadable or invalid files are reported and replaced by the
/// default configuration.
fn load_config(config_path: Option<&str>) -> Result<Config, ConfigError> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            match Config::from_file(std::path::Path::new(path)) {
                Ok(config) => Ok(config),
                Err(ConfigError::ReadError(_)) => {
                    warn!(
                        "Configuration file '{}' not found or unreadable, using defaults",
                        path
                    );
                    Ok(Config::default())
                }
                Err(e) => {
                    error!("Configuration error in '{}': {}", path, e);
                    warn!("Using default configuration due to invalid config file");
                    Ok(Config::default())
                }
            }
        }
        None => {
            info!("Using default configuration");
            Ok(Config::default())
        }
    }
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = cli.seed {
        match &mut config.source {
            SourceConfig::Synthetic { seed: configured } => *configured = Some(seed),
            SourceConfig::JsonLines { .. } => {
                warn!("--seed has no effect on a JSON lines source");
            }
        }
    }
}

fn report_alert(alert: &Alert) {
    match alert.severity {
        Severity::High | Severity::Critical => warn!(
            "[{}] {} ({})",
            alert.severity,
            alert.message,
            alert.alert_type
        ),
        Severity::Medium | Severity::Info => info!(
            "[{}] {} ({})",
            alert.severity,
            alert.message,
            alert.alert_type
        ),
    }
}

/// Log alerts not seen before, oldest first, and forget ids no longer retained
fn report_new_alerts(alerts: &[Alert], reported: &mut HashSet<String>) -> usize {
    reported.retain(|id| alerts.iter().any(|alert| &alert.id == id));

    let mut logged = 0;
    for alert in alerts.iter().rev() {
        if reported.insert(alert.id.clone()) {
            report_alert(alert);
            logged += 1;
        }
    }
    logged
}

fn report_stats(controller: &MonitoringController) {
    let stats = controller.stats();
    info!(
        "{} mentions: {} positive, {} neutral, {} negative, average sentiment {:.2}",
        stats.total, stats.positive, stats.neutral, stats.negative, stats.avg_sentiment_score
    );

    let mentions = controller.mentions();
    let top_topic = topic_distribution(&mentions)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count);
    if let Some((topic, count)) = top_topic {
        info!("Top topic: {} ({} mentions)", topic, count);
    }
    let top_platform = platform_distribution(&mentions)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count);
    if let Some((platform, count)) = top_platform {
        info!("Top platform: {} ({} mentions)", platform, count);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config_path_str()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration path")?;
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, cli);

    let interval = config.monitoring.tick_interval();
    let history_spacing =
        chrono::Duration::from_std(interval).context("Tick interval out of range")?;
    let source = sources::from_config(&config.source, history_spacing)
        .context("Failed to open mention source")?;

    let controller = MonitoringController::new(&config, source);
    controller.start().context("Failed to start monitoring")?;

    let (shutdown_sender, shutdown_receiver) = mpsc::channel();
    ctrlc::set_handler(move || {
        info!("Received interrupt signal (SIGINT), shutting down gracefully...");
        if let Err(e) = shutdown_sender.send(()) {
            error!("Failed to send shutdown signal: {}", e);
        }
    })
    .context("Error setting SIGINT handler for graceful shutdown")?;

    info!("Mention monitor is running. Press Ctrl+C to stop.");

    let mut reported: HashSet<String> = HashSet::new();
    loop {
        match shutdown_receiver.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                let alerts = controller.alerts();
                report_new_alerts(&alerts, &mut reported);
                report_stats(&controller);

                if cli.ticks.is_some_and(|limit| controller.tick_count() >= limit) {
                    info!("Reached {} ingested mentions", controller.tick_count());
                    break;
                }
            }
            Ok(()) => {
                info!("Shutdown signal received");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    controller.stop().context("Failed to stop monitoring")?;

    if cli.json {
        let snapshot = serde_json::to_string_pretty(&controller.snapshot())
            .context("Failed to serialize snapshot")?;
        println!("{}", snapshot);
    }

    info!("Mention monitor shutdown complete");
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    info!("Starting mention monitor");

    if let Err(e) = cli.validate() {
        error!("Invalid arguments: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
