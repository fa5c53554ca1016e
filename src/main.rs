/*!
 * StatusGate CLI - Command Line Interface
 */

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use statusgate::{
    config::{LogLevel, StatusGateConfig},
    error::{exit_code_for, Result, StatusGateError, EXIT_SUCCESS},
    logging, ConsoleOverlay, StatusGate,
};
use statusgate_core_status::BackgroundFetchResult;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(name = "statusgate")]
#[command(version, about = "Remote kill switch and forced-upgrade watcher", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// JSON status document to read (overrides the config file)
    #[arg(short = 's', long = "status-file", value_name = "PATH", global = true)]
    status_file: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch status once and exit with a code describing the outcome
    Check,

    /// Keep checking status until interrupted
    Watch {
        /// Background fetch interval in seconds
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination of the configuration file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    if let Commands::InitConfig { path, force } = &cli.command {
        return init_config(path, *force);
    }

    let config = load_config(&cli)?;
    logging::init_logging(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Check => check(&config).await,
            Commands::Watch { interval } => {
                let mut config = config;
                if let Some(secs) = interval {
                    config.background_interval_secs = secs;
                    config.max_background_interval_secs =
                        config.max_background_interval_secs.max(secs);
                }
                watch_status(&config).await
            }
            Commands::InitConfig { .. } => Ok(EXIT_SUCCESS),
        }
    })
}

/// Merge the config file (if any) with command line overrides
fn load_config(cli: &Cli) -> Result<StatusGateConfig> {
    let mut config = match &cli.config {
        Some(path) => StatusGateConfig::from_file(path)?,
        None => StatusGateConfig::default(),
    };

    if let Some(status_file) = &cli.status_file {
        config.status_file = status_file.clone();
    }
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.verbose {
        config.verbose = true;
    }

    Ok(config)
}

fn init_config(path: &Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        return Err(StatusGateError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    StatusGateConfig::default().to_file(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(EXIT_SUCCESS)
}

async fn check(config: &StatusGateConfig) -> Result<i32> {
    let gate = StatusGate::new(config, ConsoleOverlay::new())?;
    let result = gate.check_once().await;

    match result {
        BackgroundFetchResult::NewData => {
            println!("{} Service operational", style("OK").green().bold())
        }
        BackgroundFetchResult::NoData if gate.source().update_required() => {
            println!("{} Update required", style("UPDATE").yellow().bold())
        }
        BackgroundFetchResult::NoData => {
            println!("{} Service blocked", style("BLOCKED").red().bold())
        }
        BackgroundFetchResult::Failed => println!(
            "{} Could not read status from {}",
            style("FAILED").red().bold(),
            config.status_file.display()
        ),
    }

    Ok(exit_code_for(result))
}

async fn watch_status(config: &StatusGateConfig) -> Result<i32> {
    let gate = StatusGate::new(config, ConsoleOverlay::new())?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let ctrl_c = async {
        let signal = tokio::signal::ctrl_c().await;
        info!("Interrupt received, shutting down");
        // Stop re-checks before the background loop winds down
        gate.orchestrator().enter_background();
        let _ = shutdown_tx.send(true);
        signal
    };

    let (signal, ()) = tokio::join!(ctrl_c, gate.watch(shutdown_rx));
    signal?;

    Ok(EXIT_SUCCESS)
}
