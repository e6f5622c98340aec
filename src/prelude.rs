//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use fan_dashboard::prelude::*;
//! ```

// Core
pub use crate::core::config::{CliOverrides, Config};
pub use crate::core::errors::{FanError, Result};

// Sensors
pub use crate::sensors::normalize::normalize;
pub use crate::sensors::provider::{ScriptedProvider, StateProvider, SysfsProvider};
pub use crate::sensors::registry::{BlockId, FieldId, FormatKind, Registry};
pub use crate::sensors::snapshot::{Snapshot, Value};

// Dashboard
pub use crate::dashboard::events::{EventSource, LoopEvent, ScriptedEvents, ShutdownCause};
pub use crate::dashboard::format::{DisplayString, Style, format_value};
pub use crate::dashboard::layout::{Dimensions, LayoutMap, ScreenCoordinate, compute_layout};
pub use crate::dashboard::render::{Renderer, StatusLine};
pub use crate::dashboard::runtime::{Dashboard, DashboardSettings, Phase, run_terminal};

// Logger
pub use crate::logger::jsonl::{JsonlConfig, JsonlWriter};
