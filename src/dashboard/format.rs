//! Value formatting: raw value + [`FormatKind`] → styled display text.
//!
//! Display strings stay structured ([`DisplayString`]) until the final write,
//! so width is always the length of the plain text. [`strip_markup`] exists
//! for already-serialized strings and only understands SGR escapes
//! (`ESC [ params m`), which is all [`DisplayString::to_markup`] emits.

#![allow(missing_docs)]

use std::sync::OnceLock;

use crossterm::style::{Color, Stylize};
use regex::Regex;

use crate::sensors::registry::FormatKind;
use crate::sensors::snapshot::{NOT_APPLICABLE, Value};

/// RPM below this is "low".
pub const RPM_MID: i64 = 1200;
/// RPM at or above this is "high".
pub const RPM_HIGH: i64 = 3000;
/// Degrees below this are "low".
pub const TEMP_MID: i64 = 50;
/// Degrees at or above this are "high".
pub const TEMP_HIGH: i64 = 70;

/// Semantic style of a display string; mapped to a color only at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Neutral,
    Low,
    Mid,
    High,
    ModeAuto,
    ModeFixed,
    ModeCurve,
    PowerQuiet,
    PowerBalanced,
    PowerPerformance,
    NotApplicable,
}

impl Style {
    /// Terminal color for the style; `None` leaves the default foreground.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Self::Neutral => None,
            Self::Low | Self::ModeAuto | Self::PowerQuiet => Some(Color::Green),
            Self::Mid => Some(Color::Yellow),
            Self::High | Self::PowerPerformance => Some(Color::Red),
            Self::ModeFixed | Self::PowerBalanced => Some(Color::Cyan),
            Self::ModeCurve => Some(Color::Magenta),
            Self::NotApplicable => Some(Color::DarkGrey),
        }
    }
}

/// Display text plus its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayString {
    pub text: String,
    pub style: Style,
}

impl DisplayString {
    /// Control characters in `text` are replaced with `?` so a value can
    /// never move the cursor or emit its own escape sequences.
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        let mut text = text.into();
        if text.chars().any(char::is_control) {
            text = text
                .chars()
                .map(|c| if c.is_control() { '?' } else { c })
                .collect();
        }
        Self { text, style }
    }

    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::Neutral)
    }

    /// Columns the string occupies on screen.
    #[must_use]
    pub fn visible_width(&self) -> usize {
        self.text.chars().count()
    }

    /// Keep at most `width` visible characters.
    #[must_use]
    pub fn truncated(&self, width: usize) -> Self {
        if self.visible_width() <= width {
            return self.clone();
        }
        Self::new(self.text.chars().take(width).collect::<String>(), self.style)
    }

    /// Serialize to terminal markup. With `color` off, or for neutral text,
    /// the markup is the plain text.
    #[must_use]
    pub fn to_markup(&self, color: bool) -> String {
        match self.style.color() {
            Some(c) if color && !self.text.is_empty() => {
                self.text.as_str().with(c).to_string()
            }
            _ => self.text.clone(),
        }
    }
}

/// Format one value for display.
#[must_use]
pub fn format_value(value: &Value, kind: FormatKind) -> DisplayString {
    if value.is_not_applicable() {
        return DisplayString::new(NOT_APPLICABLE, Style::NotApplicable);
    }
    match kind {
        FormatKind::Plain => DisplayString::plain(value.to_string()),
        FormatKind::RpmWithThresholds => value.as_integer().map_or_else(
            || DisplayString::plain(value.to_string()),
            |rpm| DisplayString::new(format!("{rpm} RPM"), rpm_style(rpm)),
        ),
        FormatKind::TempWithThresholds => value.as_integer().map_or_else(
            || DisplayString::plain(value.to_string()),
            |deg| DisplayString::new(format!("{deg}°C"), temp_style(deg)),
        ),
        FormatKind::FanModeTag => {
            let text = value.to_string();
            match fan_mode_style(text.trim()) {
                Some(style) => DisplayString::new(format!("[{}]", text.trim()), style),
                None => DisplayString::plain(text),
            }
        }
        FormatKind::PowerModeTag => {
            let text = value.to_string();
            let style = power_mode_style(text.trim()).unwrap_or(Style::Neutral);
            DisplayString::new(text, style)
        }
    }
}

#[must_use]
pub const fn rpm_style(rpm: i64) -> Style {
    if rpm < RPM_MID {
        Style::Low
    } else if rpm < RPM_HIGH {
        Style::Mid
    } else {
        Style::High
    }
}

#[must_use]
pub const fn temp_style(deg: i64) -> Style {
    if deg < TEMP_MID {
        Style::Low
    } else if deg < TEMP_HIGH {
        Style::Mid
    } else {
        Style::High
    }
}

fn fan_mode_style(mode: &str) -> Option<Style> {
    match mode {
        "auto" => Some(Style::ModeAuto),
        "fixed" => Some(Style::ModeFixed),
        "curve" => Some(Style::ModeCurve),
        _ => None,
    }
}

fn power_mode_style(mode: &str) -> Option<Style> {
    match mode {
        "quiet" => Some(Style::PowerQuiet),
        "balanced" => Some(Style::PowerBalanced),
        "performance" => Some(Style::PowerPerformance),
        _ => None,
    }
}

fn sgr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("static SGR pattern compiles"))
}

/// Remove SGR escape sequences from serialized markup.
#[must_use]
pub fn strip_markup(markup: &str) -> String {
    sgr_pattern().replace_all(markup, "").into_owned()
}

/// Visible width of serialized markup.
#[must_use]
pub fn visible_width(markup: &str) -> usize {
    strip_markup(markup).chars().count()
}
