//! Loop event sources: signals, key presses, terminal resizes and the tick
//! deadline, merged into one blocking wait.
//!
//! Signals and terminal input are each read on a dedicated thread and
//! forwarded over a crossbeam channel. The main loop blocks on the channel
//! until the next tick deadline; a timeout is a tick. Nothing but the main
//! loop touches dashboard state.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

use crate::core::errors::Result;
use crate::dashboard::layout::Dimensions;

/// Why the loop is asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// A termination signal (its number).
    Signal(i32),
    /// `q`, `Esc` or `Ctrl-C` typed at the dashboard.
    UserQuit,
}

/// What woke the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    TickElapsed,
    ResizeRequested(Dimensions),
    ShutdownRequested(ShutdownCause),
}

/// Blocking source of loop events.
pub trait EventSource {
    /// Wait until an event arrives or `deadline` passes, whichever is first.
    /// Reaching the deadline yields [`LoopEvent::TickElapsed`].
    fn next_event(&mut self, deadline: Instant) -> LoopEvent;
}

// ──────────────────── terminal + signals ────────────────────

/// Live event source: termination signals and terminal input.
pub struct TerminalEvents {
    tx: Sender<LoopEvent>,
    rx: Receiver<LoopEvent>,
    signals: Option<Handle>,
}

impl TerminalEvents {
    /// Channel only; no listener threads. Useful with [`Self::sender`].
    #[must_use]
    pub fn detached() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            signals: None,
        }
    }

    /// Register SIGTERM/SIGINT/SIGHUP/SIGQUIT and start the signal and
    /// terminal-input threads.
    ///
    /// # Errors
    /// Fails if the signal handlers cannot be registered or a thread cannot
    /// be spawned.
    pub fn spawn() -> Result<Self> {
        let mut events = Self::detached();
        events.signals = Some(spawn_signal_listener(events.tx.clone())?);
        spawn_input_listener(events.tx.clone())?;
        Ok(events)
    }

    /// Handle for injecting events from elsewhere (e.g. a watchdog).
    #[must_use]
    pub fn sender(&self) -> Sender<LoopEvent> {
        self.tx.clone()
    }
}

impl EventSource for TerminalEvents {
    fn next_event(&mut self, deadline: Instant) -> LoopEvent {
        match self.rx.recv_deadline(deadline) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                // `tx` is held by self, so a disconnect cannot happen; treat it
                // like a timeout anyway.
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
                LoopEvent::TickElapsed
            }
        }
    }
}

impl Drop for TerminalEvents {
    fn drop(&mut self) {
        if let Some(handle) = self.signals.take() {
            handle.close();
        }
    }
}

fn spawn_signal_listener(tx: Sender<LoopEvent>) -> Result<Handle> {
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP, SIGQUIT])?;
    let handle = signals.handle();
    thread::Builder::new()
        .name("fandash-signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                let event = LoopEvent::ShutdownRequested(ShutdownCause::Signal(signal));
                if tx.send(event).is_err() {
                    break;
                }
            }
        })?;
    Ok(handle)
}

fn spawn_input_listener(tx: Sender<LoopEvent>) -> Result<()> {
    thread::Builder::new()
        .name("fandash-input".to_string())
        .spawn(move || {
            while let Ok(raw) = event::read() {
                let Some(event) = translate(&raw) else {
                    continue;
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

/// Map a terminal event to a loop event, if it matters to the dashboard.
#[must_use]
pub fn translate(raw: &Event) -> Option<LoopEvent> {
    match raw {
        Event::Resize(cols, rows) => Some(LoopEvent::ResizeRequested(Dimensions::new(*rows, *cols))),
        Event::Key(key) if is_quit_key(key) => {
            Some(LoopEvent::ShutdownRequested(ShutdownCause::UserQuit))
        }
        _ => None,
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ──────────────────── scripted ────────────────────

/// Replays a fixed event list, then shuts down. Records every deadline it
/// was asked to wait for.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<LoopEvent>,
    deadlines: Vec<Instant>,
}

impl ScriptedEvents {
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = LoopEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
            deadlines: Vec::new(),
        }
    }

    #[must_use]
    pub fn deadlines(&self) -> &[Instant] {
        &self.deadlines
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self, deadline: Instant) -> LoopEvent {
        self.deadlines.push(deadline);
        self.queue
            .pop_front()
            .unwrap_or(LoopEvent::ShutdownRequested(ShutdownCause::UserQuit))
    }
}
