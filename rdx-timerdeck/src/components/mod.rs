//! Contains the building blocks the engine runs on every tick.
//!
//! `tick` decides what a tick does to the running timers without touching
//! any shared state, and `watcher` holds the callbacks that react to alerts.
//! The `TimerEngine` combines the two with the shared store.

pub mod tick;
pub mod watcher;
