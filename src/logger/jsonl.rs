//! JSONL activity log: one self-contained JSON object per line.
//!
//! Lines are assembled in memory and written with a single `write_all` so a
//! concurrent `tail -f` never sees a partial line. While the dashboard owns
//! the screen nothing may be printed to stderr, so the fallback chain is
//! short:
//! 1. Configured file path
//! 2. Silent discard (the dashboard must never fail because of logging)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FanError, Result};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Dashboard lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DashboardStart,
    Resize,
    AcquisitionFailure,
    DashboardStop,
}

/// A single JSONL log entry. Only `ts`, `event` and `severity` are always set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Terminal rows at the time of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<f64>,
    /// Whether values were shown without normalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    /// Fields that found a place on screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_fields: Option<usize>,
    /// Completed polls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polls: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            rows: None,
            cols: None,
            interval_secs: None,
            raw: None,
            placed_fields: None,
            polls: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    /// Maximum file size before rotation (bytes). Default: 10 MiB.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep. Default: 3.
    pub max_rotated_files: u32,
}

impl JsonlConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

/// Append-only JSONL writer with size-based rotation.
pub struct JsonlWriter {
    config: Option<JsonlConfig>,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl JsonlWriter {
    /// Open the log file; on failure the writer starts out discarding.
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config: Some(config),
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        w.try_open();
        w
    }

    /// A writer that drops everything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            config: None,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        }
    }

    /// Open `path` when given, otherwise a disabled writer.
    pub fn from_option(path: Option<&Path>) -> Self {
        path.map_or_else(Self::disabled, |p| Self::open(JsonlConfig::new(p)))
    }

    /// Write one entry as a single line and flush it.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        if self.state == WriterState::Discard {
            return;
        }
        let Ok(json) = serde_json::to_string(entry) else {
            return;
        };
        self.write_line(&format!("{json}\n"));
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Discard => "discard",
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        let max = self.config.as_ref().map_or(u64::MAX, |c| c.max_size_bytes);
        if self.bytes_written > 0 && self.bytes_written + line.len() as u64 > max {
            self.rotate();
        }

        let Some(w) = self.writer.as_mut() else {
            self.degrade();
            return;
        };
        // Flushed per line: events are rare and must survive a crash.
        if w.write_all(line.as_bytes()).and_then(|()| w.flush()).is_err() {
            self.degrade();
            return;
        }
        self.bytes_written += line.len() as u64;
    }

    fn try_open(&mut self) {
        let Some(config) = &self.config else {
            return;
        };
        if let Ok((file, size)) = open_append(&config.path) {
            self.writer = Some(BufWriter::new(file));
            self.state = WriterState::Normal;
            self.bytes_written = size;
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        self.state = WriterState::Discard;
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        let Some(config) = &self.config else {
            return;
        };
        let base = &config.path;

        // Shift existing rotations: .3 is overwritten by .2, .2 by .1, current → .1
        for i in (1..config.max_rotated_files).rev() {
            let _ = rename(rotated_name(base, i), rotated_name(base, i + 1));
        }
        if config.max_rotated_files == 0 {
            let _ = fs::remove_file(base);
        } else {
            let _ = rename(base, rotated_name(base, 1));
        }

        match open_append(base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::new(file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| FanError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| FanError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// `foo.jsonl` → `foo.jsonl.3`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Write `msg` to stderr with the log tag. Only for use before the dashboard
/// takes over the screen or after it has released it.
pub fn stderr_notice(msg: &str) {
    let _ = writeln!(io::stderr(), "[FAN-LOG] {msg}");
}

// ──────────────────────── tests ────────────────────────
