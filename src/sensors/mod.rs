//! Sensor side of the dashboard: field tables, value snapshots, providers and
//! the normalization rules applied before display.

pub mod normalize;
pub mod provider;
pub mod registry;
pub mod snapshot;
