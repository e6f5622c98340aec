//! The dashboard loop: `Initializing → Running → ShuttingDown`.
//!
//! [`Dashboard`] owns the layout and the last snapshot and is the only code
//! that writes either. It blocks on an [`EventSource`] until the next tick
//! deadline and handles one event at a time. [`run_terminal`] wires it to the
//! sysfs provider, stdout and the live signal/input threads.

#![allow(missing_docs)]

use std::io::{self, BufWriter, Write};
use std::time::{Duration, Instant};

use crate::core::config::Config;
use crate::core::errors::{FanError, Result};
use crate::dashboard::events::{EventSource, LoopEvent, ShutdownCause, TerminalEvents};
use crate::dashboard::layout::{Dimensions, LayoutMap, compute_layout};
use crate::dashboard::render::{Renderer, StatusLine};
use crate::dashboard::terminal_guard::TerminalGuard;
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity, stderr_notice};
use crate::sensors::normalize::normalize;
use crate::sensors::provider::{StateProvider, SysfsProvider};
use crate::sensors::registry::Registry;
use crate::sensors::snapshot::Snapshot;

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    ShuttingDown,
}

/// Loop knobs taken from the resolved [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub interval: Duration,
    pub raw: bool,
    pub color: bool,
}

impl DashboardSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.interval(),
            raw: config.raw,
            color: config.color,
        }
    }
}

pub struct Dashboard<P: StateProvider, W: Write> {
    provider: P,
    renderer: Renderer<W>,
    registry: Registry,
    settings: DashboardSettings,
    phase: Phase,
    layout: LayoutMap,
    snapshot: Snapshot,
    polls: u64,
    log: JsonlWriter,
}

impl<P: StateProvider, W: Write> Dashboard<P, W> {
    /// A dashboard for the built-in registry, not yet initialized.
    pub fn new(provider: P, out: W, dims: Dimensions, settings: DashboardSettings) -> Self {
        let registry = Registry::builtin();
        Self {
            provider,
            renderer: Renderer::new(out, settings.color),
            layout: compute_layout(dims, &registry),
            registry,
            settings,
            phase: Phase::Initializing,
            snapshot: Snapshot::new(),
            polls: 0,
            log: JsonlWriter::disabled(),
        }
    }

    /// Replace the field registry. Only meaningful before [`Self::run`].
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.layout = compute_layout(self.layout.dimensions(), &registry);
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: JsonlWriter) -> Self {
        self.log = log;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn layout(&self) -> &LayoutMap {
        &self.layout
    }

    /// Snapshot on screen (normalized unless raw mode).
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Successful provider polls so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn writer(&self) -> &W {
        self.renderer.writer()
    }

    pub fn into_writer(self) -> W {
        self.renderer.into_inner()
    }

    /// Run until a shutdown request or an acquisition failure.
    ///
    /// The shutdown screen is drawn on every exit path.
    ///
    /// # Errors
    /// Provider failures end the loop and are returned unchanged; terminal
    /// write failures surface as [`FanError::Terminal`].
    pub fn run<E: EventSource>(&mut self, events: &mut E) -> Result<ShutdownCause> {
        let outcome = self.initialize().and_then(|()| self.run_loop(events));
        if let Err(err) = &outcome
            && err.is_acquisition()
        {
            let mut entry = LogEntry::new(EventType::AcquisitionFailure, Severity::Critical);
            entry.error_code = Some(err.code().to_string());
            entry.error_message = Some(err.to_string());
            entry.polls = Some(self.polls);
            self.log.write_entry(&entry);
        }

        let stopped = self.shut_down(outcome.as_ref().ok().copied());
        let cause = outcome?;
        stopped.map(|()| cause)
    }

    fn initialize(&mut self) -> Result<()> {
        self.phase = Phase::Initializing;
        self.renderer.hide_cursor()?;
        self.snapshot = self.acquire()?;
        self.repaint()?;

        let dims = self.layout.dimensions();
        let mut entry = LogEntry::new(EventType::DashboardStart, Severity::Info);
        entry.rows = Some(dims.rows);
        entry.cols = Some(dims.cols);
        entry.interval_secs = Some(self.settings.interval.as_secs_f64());
        entry.raw = Some(self.settings.raw);
        entry.placed_fields = Some(self.layout.len());
        self.log.write_entry(&entry);

        self.phase = Phase::Running;
        Ok(())
    }

    fn run_loop<E: EventSource>(&mut self, events: &mut E) -> Result<ShutdownCause> {
        let interval = self.settings.interval;
        let mut deadline = Instant::now() + interval;
        loop {
            match events.next_event(deadline) {
                LoopEvent::TickElapsed => {
                    self.tick()?;
                    deadline = next_deadline(deadline, interval, Instant::now());
                }
                LoopEvent::ResizeRequested(dims) => self.resize(dims)?,
                LoopEvent::ShutdownRequested(cause) => return Ok(cause),
            }
        }
    }

    fn tick(&mut self) -> Result<()> {
        self.snapshot = self.acquire()?;
        self.renderer
            .draw_values(&self.layout, &self.registry, &self.snapshot)?;
        Ok(())
    }

    /// New layout, full repaint from the cached snapshot. No poll.
    fn resize(&mut self, dims: Dimensions) -> Result<()> {
        self.layout = compute_layout(dims, &self.registry);
        self.repaint()?;

        let mut entry = LogEntry::new(EventType::Resize, Severity::Info);
        entry.rows = Some(dims.rows);
        entry.cols = Some(dims.cols);
        entry.placed_fields = Some(self.layout.len());
        if self.layout.dropped_blocks() > 0 {
            entry.severity = Severity::Warning;
            entry.details = Some(format!("{} block(s) hidden", self.layout.dropped_blocks()));
        }
        self.log.write_entry(&entry);
        Ok(())
    }

    fn shut_down(&mut self, cause: Option<ShutdownCause>) -> Result<()> {
        self.phase = Phase::ShuttingDown;
        let drawn = self.renderer.draw_shutdown();

        let mut entry = LogEntry::new(EventType::DashboardStop, Severity::Info);
        entry.polls = Some(self.polls);
        entry.details = Some(match cause {
            Some(ShutdownCause::Signal(n)) => format!("signal {n}"),
            Some(ShutdownCause::UserQuit) => "user quit".to_string(),
            None => "error".to_string(),
        });
        self.log.write_entry(&entry);

        drawn.map_err(FanError::from)
    }

    fn repaint(&mut self) -> io::Result<()> {
        let status = StatusLine {
            interval: self.settings.interval,
            raw: self.settings.raw,
        };
        self.renderer
            .draw_chrome(&self.layout, &self.registry, &status)?;
        self.renderer
            .draw_values(&self.layout, &self.registry, &self.snapshot)
    }

    fn acquire(&mut self) -> Result<Snapshot> {
        let raw = self.provider.snapshot()?;
        self.polls += 1;
        Ok(if self.settings.raw { raw } else { normalize(&raw) })
    }
}

/// Next tick deadline: one interval after the previous one, unless the loop
/// is already past that point, in which case one interval from `now`.
#[must_use]
pub fn next_deadline(previous: Instant, interval: Duration, now: Instant) -> Instant {
    let next = previous + interval;
    if next <= now { now + interval } else { next }
}

/// Run the live dashboard on the controlling terminal until shutdown.
///
/// The terminal is restored before this returns, on success and on error.
///
/// # Errors
/// [`FanError::ModuleNotLoaded`] if the sensor tree is absent, acquisition
/// errors from the loop, and terminal setup/write failures.
pub fn run_terminal(config: &Config) -> Result<ShutdownCause> {
    let provider = SysfsProvider::new(&config.sysfs_root, &config.module_name);
    provider.check_present()?;

    let log = JsonlWriter::from_option(config.log_file.as_deref());
    if let Some(path) = &config.log_file
        && log.state() == "discard"
    {
        stderr_notice(&format!(
            "activity log {} unavailable, continuing without it",
            path.display()
        ));
    }

    // Handlers go in before raw mode so a signal can never skip the restore.
    // Declared first, dropped after the guard.
    let mut events = TerminalEvents::spawn()?;
    let _guard = TerminalGuard::new()?;
    let out = BufWriter::new(io::stdout());
    let mut dashboard = Dashboard::new(
        provider,
        out,
        TerminalGuard::dimensions(),
        DashboardSettings::from_config(config),
    )
    .with_log(log);
    dashboard.run(&mut events)
}
