//! # Timerdeck
//!
//! Categorised countdown timers driven by a one-second tick engine.
//!
//! Timerdeck keeps a small collection of timers, categories and completed-timer
//! history in a single store, persists every change as a full snapshot, and
//! counts running timers down from a periodic ticker.
//!
//! ## Core Concepts
//!
//! - **Store**: owns the `TimerState` and applies `Action`s through a pure
//!   transition function. Every change is saved and announced.
//! - **TimerEngine**: arms a fixed-interval ticker while any timer runs. Each
//!   tick counts running timers down, completes them at zero and raises
//!   halfway and completion alerts.
//! - **Repository**: the storage seam. A JSON file in the data directory by
//!   default, or memory for tests.
//! - **Configuration-Driven**: tick period, storage location, export target and
//!   display timezone come from a `TimerdeckConfig`, often loaded from a file.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use timerdeck::common::now_millis;
//! use timerdeck::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Load configuration and open the snapshot repository.
//!     let config = TimerdeckConfig::load(None)?;
//!     let repository = JsonFileRepository::from_config(&config.storage)?;
//!
//!     // 2. Create and hydrate the store.
//!     let mut store = Store::new(Box::new(repository));
//!     store.hydrate();
//!
//!     // 3. Create the engine and listen for alerts.
//!     let engine = TimerEngine::new(config, store.shared());
//!     let mut alerts = engine.subscribe_alerts();
//!     tokio::spawn(async move {
//!         while let Ok(alert) = alerts.recv().await {
//!             println!("{}: {}", alert.title(), alert.message());
//!         }
//!     });
//!
//!     // 4. Add and start a timer.
//!     let timer = Timer::new("timer_tea", "Tea", 180, "category_personal", now_millis());
//!     engine.dispatch(Action::AddTimer(timer)).await;
//!     engine.dispatch(Action::StartTimer("timer_tea".into())).await;
//!
//!     // 5. Run the engine. It will shut down on Ctrl+C.
//!     engine.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Timerdeck";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod common;
pub mod components;
pub mod config;
pub mod draft;
pub mod engine;
pub mod events;
pub mod export;
pub mod history;
pub mod model;
pub mod persistence;
pub mod store;

/// A prelude module for easy importing of the most common Timerdeck types.
pub mod prelude {
    pub use crate::common::{CategoryId, ListenerId, LogId, TimerId};
    pub use crate::components::watcher::AlertFilter;
    pub use crate::config::{TickResolution, TimerdeckConfig};
    pub use crate::draft::{CategoryDraft, TimerDraft};
    pub use crate::engine::TimerEngine;
    pub use crate::events::{AlertEvent, SystemEvent};
    pub use crate::export::{export_logs, ExportError, ShareTarget};
    pub use crate::model::{Category, Timer, TimerLog, TimerState, TimerStatus};
    pub use crate::persistence::{JsonFileRepository, MemoryRepository, StateRepository, StorageError};
    pub use crate::store::{Action, SharedStore, Store};
}
