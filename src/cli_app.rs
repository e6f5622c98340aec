//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::control;
use serde::Serialize;
use thiserror::Error;

use fan_dashboard::core::config::{CliOverrides, Config, validate_interval};
use fan_dashboard::core::errors::FanError;
use fan_dashboard::dashboard::events::ShutdownCause;
use fan_dashboard::dashboard::runtime::run_terminal;
use fan_dashboard::sensors::normalize::normalize;
use fan_dashboard::sensors::provider::{StateProvider, SysfsProvider};
use fan_dashboard::sensors::snapshot::Snapshot;

/// Live fan, temperature and power dashboard for the EC fan driver.
#[derive(Debug, Parser)]
#[command(
    name = "fandash",
    author,
    version,
    about = "Live fan, temperature and power dashboard",
    long_about = None
)]
pub struct Cli {
    /// Seconds between sensor polls, 0.3 to 10 [default: 1.0].
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_interval)]
    interval: Option<f64>,
    /// Show values exactly as read, without mode-based N/A substitution.
    #[arg(short, long)]
    raw: bool,
    /// Print one JSON snapshot to stdout and exit.
    #[arg(short, long)]
    json: bool,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding one file per sensor field.
    #[arg(long, value_name = "PATH")]
    sysfs_root: Option<PathBuf>,
    /// Append lifecycle events to this JSONL file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            interval_secs: self.interval,
            raw: self.raw,
            no_color: self.no_color,
            sysfs_root: self.sysfs_root.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

fn parse_interval(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    validate_interval(secs).map_err(|e| e.to_string())?;
    Ok(secs)
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad configuration file, environment or flag value.
    #[error("{0}")]
    User(FanError),
    /// Sensor tree or terminal failure.
    #[error("{0}")]
    Runtime(FanError),
    /// Internal bug or serialization failure.
    #[error("{0}")]
    Internal(FanError),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<FanError> for CliError {
    fn from(err: FanError) -> Self {
        if err.is_config() {
            Self::User(err)
        } else if matches!(err, FanError::Serialization { .. }) {
            Self::Internal(err)
        } else {
            Self::Runtime(err)
        }
    }
}

/// Resolve configuration, then either print one snapshot or run the
/// dashboard until it is told to stop.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref(), &cli.overrides())?;
    if !config.color {
        control::set_override(false);
    }

    if cli.json {
        return print_snapshot(&config);
    }

    let cause = run_terminal(&config)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "fandash: terminated ({})", describe(cause))?;
    Ok(())
}

fn describe(cause: ShutdownCause) -> String {
    match cause {
        ShutdownCause::Signal(n) => format!("signal {n}"),
        ShutdownCause::UserQuit => "user request".to_string(),
    }
}

/// One-shot export of the current readings.
#[derive(Debug, Serialize)]
struct SnapshotReport<'a> {
    timestamp: String,
    raw: bool,
    fields: &'a Snapshot,
}

fn print_snapshot(config: &Config) -> Result<(), CliError> {
    let provider = SysfsProvider::new(&config.sysfs_root, &config.module_name);
    provider.check_present()?;
    let raw = provider.snapshot()?;
    let fields = if config.raw { raw } else { normalize(&raw) };

    let report = SnapshotReport {
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        raw: config.raw,
        fields: &fields,
    };
    write_json_line(&report)
}

fn write_json_line<T: Serialize>(payload: &T) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}
