#![forbid(unsafe_code)]

//! fandash: a live terminal dashboard for an embedded-controller fan driver.
//!
//! Readings (fan speed, mode, level, ramp curves, temperature, power mode) are
//! polled from one sysfs file per field and drawn into fixed 40-column blocks
//! that reflow when the terminal is resized. Only value cells are rewritten on
//! each tick; titles and labels are painted once per layout.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use fan_dashboard::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use fan_dashboard::dashboard::layout::{Dimensions, compute_layout};
//! use fan_dashboard::sensors::registry::Registry;
//!
//! let map = compute_layout(Dimensions::new(24, 80), &Registry::builtin());
//! assert_eq!(map.blocks().len(), 4);
//! ```

pub mod prelude;

pub mod core;
pub mod dashboard;
pub mod logger;
pub mod sensors;
