//! The state store: owns the timer state, applies actions, persists snapshots
//! and announces changes.
//!
//! A `Store` is created once per session and shared between the shell and the
//! engine as a [`SharedStore`]. Every dispatch takes the write lock, so
//! dispatches apply strictly in the order they were issued.

pub mod action;
pub mod reducer;

pub use action::Action;
pub use reducer::{transition, transition_at};

use crate::model::{Category, TimerState};
use crate::persistence::StateRepository;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info};

/// The store as shared between async tasks.
pub type SharedStore = Arc<RwLock<Store>>;

/// Announced after every dispatch that changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    /// Increases by one for every change.
    pub revision: u64,
}

pub struct Store {
    state: TimerState,
    revision: u64,
    repository: Box<dyn StateRepository>,
    change_sender: broadcast::Sender<StateChanged>,
}

impl Store {
    /// Creates an empty store backed by `repository`. Call [`Store::hydrate`] to load.
    pub fn new(repository: Box<dyn StateRepository>) -> Self {
        let (change_sender, _) = broadcast::channel(256);
        Self {
            state: TimerState::default(),
            revision: 0,
            repository,
            change_sender,
        }
    }

    /// Wraps the store for sharing.
    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Loads the persisted snapshot, or seeds the default categories when there is none.
    ///
    /// A failing load is logged and handled like a missing snapshot.
    pub fn hydrate(&mut self) {
        let stored = match self.repository.load() {
            Ok(stored) => stored,
            Err(e) => {
                error!("Failed to load state: {}", e);
                None
            }
        };
        match stored {
            Some(state) => {
                info!(
                    timers = state.timers.len(),
                    categories = state.categories.len(),
                    logs = state.logs.len(),
                    "Restored stored state"
                );
                self.dispatch(Action::SetState(state));
            }
            None => {
                info!("No stored state, seeding default categories");
                for category in Category::defaults() {
                    self.dispatch(Action::AddCategory(category));
                }
            }
        }
    }

    /// Applies `action`. When the state changed, the full snapshot is saved and
    /// subscribers are notified. Returns whether anything changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let kind = action.kind();
        let next = transition(self.state.clone(), action);
        if next == self.state {
            debug!(action = kind, "Dispatch left state unchanged");
            return false;
        }
        self.state = next;
        self.revision += 1;
        debug!(action = kind, revision = self.revision, "State changed");

        if let Err(e) = self.repository.save(&self.state) {
            error!("Failed to save state: {}", e);
        }
        self.change_sender
            .send(StateChanged {
                revision: self.revision,
            })
            .ok();
        true
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerState {
        self.state.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribes to change notices.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.change_sender.subscribe()
    }
}
