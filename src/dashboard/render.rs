//! Screen painting: full chrome redraws and incremental value redraws.
//!
//! [`Renderer::draw_chrome`] clears the screen and paints everything that only
//! changes with the layout (title, status line, block titles, field labels,
//! footer). [`Renderer::draw_values`] overwrites the fixed-width value cells
//! and nothing else, so it can run every tick without flicker.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::dashboard::format::{DisplayString, format_value};
use crate::dashboard::layout::{
    Dimensions, LABEL_INDENT, LABEL_OFFSET, LayoutMap, RESERVED_ROWS, TOP_ROW,
};
use crate::sensors::registry::{FormatKind, Registry};
use crate::sensors::snapshot::Snapshot;

/// Visible width of every value cell, padding included.
pub const FIELD_WIDTH: u16 = 15;
/// Shown in a value cell whose field is missing from the snapshot.
pub const MISSING_VALUE: &str = "--";

const TITLE: &str = "Fan Dashboard";
const FOOTER: &str = " Press q or Ctrl-C to exit ";

/// What the status line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub interval: Duration,
    pub raw: bool,
}

impl StatusLine {
    #[must_use]
    pub fn text(&self, layout: &LayoutMap) -> String {
        let dims = layout.dimensions();
        let mode = if self.raw { "raw" } else { "normalized" };
        let mut line = format!(
            " interval {}s | terminal {}x{} | {mode} values",
            format_secs(self.interval),
            dims.cols,
            dims.rows,
        );
        match layout.dropped_blocks() {
            0 => {}
            1 => line.push_str(" | 1 block hidden"),
            n => line.push_str(&format!(" | {n} blocks hidden")),
        }
        line
    }
}

/// Seconds with as many decimals as the interval needs, at least one and at
/// most six.
fn format_secs(interval: Duration) -> String {
    let micros = (interval.as_nanos() + 500) / 1_000;
    let whole = micros / 1_000_000;
    let frac = format!("{:06}", micros % 1_000_000);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{frac}")
    }
}

/// Paints the dashboard onto any byte sink.
pub struct Renderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, Hide)?;
        self.out.flush()
    }

    /// Clear the screen and repaint all static text for `layout`.
    pub fn draw_chrome(
        &mut self,
        layout: &LayoutMap,
        registry: &Registry,
        status: &StatusLine,
    ) -> io::Result<()> {
        let dims = layout.dimensions();
        queue!(self.out, ResetColor, MoveTo(0, 0), Clear(ClearType::All))?;

        let title = format!(" {TITLE} v{}", env!("CARGO_PKG_VERSION"));
        self.put(dims, 0, 0, &title, Some(Color::Cyan), true)?;
        self.put(dims, 1, 0, &status.text(layout), Some(Color::DarkGrey), false)?;

        for placement in layout.blocks() {
            let Some(block) = registry.block(placement.block) else {
                continue;
            };
            self.put(dims, placement.row, placement.col, block.title, None, true)?;
            for (offset, id) in (1u16..).zip(&block.fields) {
                let label = registry.field(*id).map_or_else(|| id.key(), |f| f.label);
                let max = usize::from(LABEL_OFFSET - LABEL_INDENT - 1);
                let text: String = format!("{label}:").chars().take(max).collect();
                self.put(
                    dims,
                    placement.row + offset,
                    placement.col + LABEL_INDENT,
                    &text,
                    None,
                    false,
                )?;
            }
        }

        if layout.is_empty() && layout.dropped_blocks() > 0 {
            self.put(
                dims,
                TOP_ROW,
                0,
                " terminal too small, enlarge to show readings",
                Some(Color::Yellow),
                false,
            )?;
        }

        if dims.rows >= RESERVED_ROWS {
            self.put(dims, dims.rows - 2, 0, FOOTER, Some(Color::Cyan), false)?;
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    /// Overwrite every placed value cell with the current reading.
    pub fn draw_values(
        &mut self,
        layout: &LayoutMap,
        registry: &Registry,
        snapshot: &Snapshot,
    ) -> io::Result<()> {
        let dims = layout.dimensions();
        for (id, coord) in layout.fields() {
            let kind = registry.field(id).map_or(FormatKind::Plain, |f| f.kind);
            let display = snapshot.get(id).map_or_else(
                || DisplayString::plain(MISSING_VALUE),
                |value| format_value(value, kind),
            );
            let width = usize::from(FIELD_WIDTH.min(dims.cols.saturating_sub(coord.col)));
            let cell = display.truncated(width);
            let pad = width - cell.visible_width();

            queue!(self.out, MoveTo(coord.col, coord.row))?;
            write!(self.out, "{}{:pad$}", cell.to_markup(self.color), "")?;
        }
        self.out.flush()
    }

    /// Undo everything the dashboard changed on screen.
    pub fn draw_shutdown(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            MoveTo(0, 0),
            Clear(ClearType::All),
            Show,
        )?;
        self.out.flush()
    }

    /// Write `text` at (row, col), skipping rows below the terminal and
    /// clipping at its right edge.
    fn put(
        &mut self,
        dims: Dimensions,
        row: u16,
        col: u16,
        text: &str,
        color: Option<Color>,
        bold: bool,
    ) -> io::Result<()> {
        if row >= dims.rows || col >= dims.cols {
            return Ok(());
        }
        let room = usize::from(dims.cols - col);
        let clipped: String = text.chars().take(room).collect();

        queue!(self.out, MoveTo(col, row))?;
        if self.color
            && let Some(c) = color
        {
            queue!(self.out, SetForegroundColor(c))?;
        }
        if bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        write!(self.out, "{clipped}")?;
        if bold {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
        }
        queue!(self.out, ResetColor)
    }
}
