use clap::Parser;
use eyre::{Context, Result};
use log::{error, info};
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod error;
mod hook;
mod message;
mod migrate;
mod runner;
mod update;
mod validate;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn log_dir() -> PathBuf {
    match std::env::var("SIGNAL_NOTIFIER_DIR") {
        Ok(dir) => PathBuf::from(dir).join("logs"),
        Err(_) => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("signal-notifier")
            .join("logs"),
    }
}

fn setup_logging(log_level: LogLevel) -> Result<()> {
    let log_dir = log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("signal-notifier.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Dispatch { event, payload } => commands::hook::dispatch(&event, payload.as_deref(), &config),
        Commands::Check { verify_sender } => commands::check::run(verify_sender, &config),
        Commands::Preview { kind, file, time } => commands::preview::run(kind, &file, time, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Import { path, dry_run } => commands::import::run(&path, dry_run, &config),
        Commands::UpdateInfo { format } => commands::update::run(cli::OutputFormat::resolve(format)),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so problems are recorded and logged below)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level).context("Failed to setup logging")?;

    info!("Starting signal-notifier");
    for problem in &config.load_problems {
        error!("{}", problem);
    }
    match &config.source {
        Some(path) => info!("Config loaded from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    run(cli, config).context("Command failed")?;

    Ok(())
}
