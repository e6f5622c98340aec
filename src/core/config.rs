//! Configuration system: TOML file + env var overrides + CLI overrides + defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{FanError, Result};

/// Smallest accepted poll interval in seconds.
pub const MIN_INTERVAL_SECS: f64 = 0.3;
/// Largest accepted poll interval in seconds.
pub const MAX_INTERVAL_SECS: f64 = 10.0;
/// Poll interval used when nothing overrides it.
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Full dashboard configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seconds between sensor polls.
    pub interval_secs: f64,
    /// Show values exactly as read, skipping normalization.
    pub raw: bool,
    /// Emit color markup.
    pub color: bool,
    /// Directory holding one file per sensor field.
    pub sysfs_root: PathBuf,
    /// Kernel module that exposes `sysfs_root`; only used in diagnostics.
    pub module_name: String,
    /// Optional JSONL activity log.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            raw: false,
            color: true,
            sysfs_root: PathBuf::from("/sys/devices/platform/ec_fan"),
            module_name: "ec_fan".to_string(),
            log_file: None,
        }
    }
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub interval_secs: Option<f64>,
    pub raw: bool,
    pub no_color: bool,
    pub sysfs_root: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Default configuration path (`~/.config/fandash/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!("[FAN-CONFIG] WARNING: HOME not set, falling back to /tmp for config");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        home_dir.join(".config").join("fandash").join("config.toml")
    }

    /// Load config from an explicit path, `$FANDASH_CONFIG`, or the default
    /// path, then apply env and CLI overrides and validate.
    ///
    /// A missing file at the default path is not an error; defaults are used.
    pub fn load(path: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env_var("FANDASH_CONFIG").map(PathBuf::from));
        let is_explicit_path = explicit.is_some();
        let path_buf = explicit.unwrap_or_else(Self::default_path);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| FanError::Io {
                path: path_buf.clone(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else if is_explicit_path {
            return Err(FanError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(env_var)?;
        cfg.apply_cli_overrides(cli);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Poll interval as a `Duration`. Unvalidated values that cannot be
    /// represented fall back to the default.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_INTERVAL_SECS))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("FANDASH_INTERVAL_SECS") {
            self.interval_secs = parse_env_f64("FANDASH_INTERVAL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("FANDASH_RAW") {
            self.raw = parse_env_bool("FANDASH_RAW", &raw)?;
        }
        if let Some(raw) = lookup("FANDASH_SYSFS_ROOT") {
            self.sysfs_root = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("FANDASH_MODULE_NAME") {
            self.module_name = raw;
        }
        if let Some(raw) = lookup("FANDASH_LOG_FILE") {
            self.log_file = Some(PathBuf::from(raw));
        }
        // NO_COLOR convention: any non-empty value disables color.
        if lookup("NO_COLOR").is_some() {
            self.color = false;
        }
        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(interval) = cli.interval_secs {
            self.interval_secs = interval;
        }
        if cli.raw {
            self.raw = true;
        }
        if cli.no_color {
            self.color = false;
        }
        if let Some(root) = &cli.sysfs_root {
            self.sysfs_root.clone_from(root);
        }
        if let Some(log) = &cli.log_file {
            self.log_file = Some(log.clone());
        }
    }

    fn validate(&self) -> Result<()> {
        validate_interval(self.interval_secs)?;
        if self.module_name.trim().is_empty() {
            return Err(FanError::InvalidConfig {
                details: "module_name must not be empty".to_string(),
            });
        }
        if self.sysfs_root.as_os_str().is_empty() {
            return Err(FanError::InvalidConfig {
                details: "sysfs_root must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Check that a poll interval lies in `[0.3, 10]` seconds.
pub fn validate_interval(secs: f64) -> Result<()> {
    if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
        return Err(FanError::InvalidConfig {
            details: format!(
                "interval must be in [{MIN_INTERVAL_SECS}, {MAX_INTERVAL_SECS}] seconds, got {secs}"
            ),
        });
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_f64(name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|error| FanError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => other.parse::<bool>().map_err(|error| FanError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        }),
    }
}
