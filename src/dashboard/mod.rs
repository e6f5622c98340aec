//! Terminal dashboard: layout engine, incremental renderer and the event loop
//! that drives them.

pub mod events;
pub mod format;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod terminal_guard;

#[cfg(test)]
mod test_properties;
