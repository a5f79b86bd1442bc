//! The tick engine that counts running timers down.
//!
//! The engine owns nothing but a handle to the shared store, a ticker and the
//! alert fan-out. It arms a fixed-interval ticker only while some timer is
//! running, and re-checks that every time the store announces a change.

use crate::common::{ListenerId, TimerId};
use crate::components::tick;
use crate::components::watcher::{AlertFilter, AlertWatcher};
use crate::config::TimerdeckConfig;
use crate::events::{AlertEvent, SystemEvent};
use crate::store::{Action, SharedStore};
use slotmap::SlotMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, trace};

/// The main timer engine.
///
/// Cloning is cheap; every clone drives the same store and the same listeners.
#[derive(Clone)]
pub struct TimerEngine {
    config: Arc<TimerdeckConfig>,
    store: SharedStore,
    alert_sender: broadcast::Sender<AlertEvent>,
    system_event_sender: broadcast::Sender<SystemEvent>,
    alert_watchers: Arc<RwLock<SlotMap<ListenerId, AlertWatcher>>>,
    tick_count: Arc<AtomicU64>,
}

// Core implementation block for internal logic.
impl TimerEngine {
    /// Creates a new `TimerEngine` over `store`.
    pub fn new(config: TimerdeckConfig, store: SharedStore) -> Self {
        let (alert_sender, _) = broadcast::channel(64);
        let (system_event_sender, _) = broadcast::channel(64);
        Self {
            config: Arc::new(config),
            store,
            alert_sender,
            system_event_sender,
            alert_watchers: Arc::new(RwLock::new(SlotMap::with_key())),
            tick_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Runs the engine until Ctrl+C is received.
    pub async fn run(&self) -> anyhow::Result<()> {
        let (shutdown_tx, _) = broadcast::channel(1);
        let engine = self.clone();
        let shutdown_rx = shutdown_tx.subscribe();
        let handle = tokio::spawn(async move { engine.run_until(shutdown_rx).await });

        info!("TimerEngine running. Press Ctrl+C to shut down.");
        tokio::signal::ctrl_c().await?;

        info!("Shutdown signal received.");
        if shutdown_tx.send(()).is_err() {
            error!("Failed to send shutdown signal. The ticker may not stop cleanly.");
        }
        handle.await?;
        Ok(())
    }

    /// Runs the ticker loop until `shutdown_rx` fires or its sender is dropped.
    pub async fn run_until(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut change_rx = self.store.read().await.subscribe();
        self.system_event_sender
            .send(SystemEvent::EngineStarted {
                timestamp: Instant::now(),
            })
            .ok();
        info!(period = ?self.config.tick.interval(), "TimerEngine started");

        let mut ticker: Option<Interval> = None;
        let mut running: Vec<TimerId> = Vec::new();
        self.resync(&mut ticker, &mut running).await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = next_tick(&mut ticker) => {
                    self.tick_once().await;
                }
                changed = change_rx.recv() => {
                    match changed {
                        Ok(_) | Err(RecvError::Lagged(_)) => self.resync(&mut ticker, &mut running).await,
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }

        if ticker.take().is_some() {
            self.system_event_sender.send(SystemEvent::TickerStopped).ok();
        }
        self.system_event_sender
            .send(SystemEvent::EngineShutdown)
            .ok();
        info!("TimerEngine has shut down.");
    }

    /// Arms, re-arms or drops the ticker to match the running timers.
    ///
    /// The ticker restarts whenever the set of running timers changes, so a
    /// newly started timer gets a full period before its first tick.
    #[doc(hidden)]
    async fn resync(&self, ticker: &mut Option<Interval>, running: &mut Vec<TimerId>) {
        let now_running: Vec<TimerId> = self
            .store
            .read()
            .await
            .state()
            .running_timers()
            .map(|t| t.id.clone())
            .collect();

        if now_running.is_empty() {
            if ticker.take().is_some() {
                debug!("No running timers, stopping ticker");
                self.system_event_sender.send(SystemEvent::TickerStopped).ok();
            }
        } else if ticker.is_none() || now_running != *running {
            let period = self.config.tick.interval();
            let mut fresh = interval_at(Instant::now() + period, period);
            fresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(fresh);
            debug!(running = now_running.len(), "Ticker armed");
            self.system_event_sender
                .send(SystemEvent::TickerStarted {
                    running: now_running.len(),
                })
                .ok();
        }
        *running = now_running;
    }

    #[doc(hidden)]
    async fn publish_alert(&self, alert: &AlertEvent) {
        info!(timer = %alert.timer_id(), "{}", alert.title());
        self.alert_sender.send(alert.clone()).ok();

        let mut watchers = self.alert_watchers.write().await;
        let mut fired_one_shots = Vec::new();
        for (id, watcher) in watchers.iter_mut() {
            if watcher.notify(alert) && watcher.is_one_shot {
                fired_one_shots.push(id);
            }
        }
        for id in fired_one_shots {
            if watchers.remove(id).is_some() {
                self.system_event_sender
                    .send(SystemEvent::ListenerRemoved { id })
                    .ok();
            }
        }
    }
}

// Public API implementation block.
impl TimerEngine {
    /// Advances every running timer by one tick and raises the resulting alerts.
    ///
    /// The plan is made and applied under one write lock, so no dispatch from
    /// elsewhere can interleave with a tick. Returns the alerts raised.
    pub async fn tick_once(&self) -> Vec<AlertEvent> {
        let plan = {
            let mut store = self.store.write().await;
            let plan = tick::plan(store.state());
            for action in plan.actions.iter().cloned() {
                store.dispatch(action);
            }
            plan
        };
        if plan.is_empty() {
            return Vec::new();
        }

        let tick_count = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(tick_count, advanced = plan.actions.len(), "Tick applied");
        self.system_event_sender
            .send(SystemEvent::Ticked {
                tick_count,
                advanced: plan.actions.len(),
            })
            .ok();

        for alert in &plan.alerts {
            self.publish_alert(alert).await;
        }
        plan.alerts
    }

    /// Applies an action to the shared store. Returns whether the state changed.
    pub async fn dispatch(&self, action: Action) -> bool {
        self.store.write().await.dispatch(action)
    }

    /// A handle to the shared store.
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Registers a handler to be called for alerts that pass `filter`.
    ///
    /// # Arguments
    /// * `filter` - Which alerts the handler receives.
    /// * `handler` - The closure to run for each alert.
    /// * `is_one_shot` - If true, the handler is removed after it first runs.
    ///
    /// # Returns
    /// A `ListenerId` which can be used to later remove this handler.
    pub async fn on_alert(
        &self,
        filter: AlertFilter,
        handler: impl FnMut(&AlertEvent) + Send + Sync + 'static,
        is_one_shot: bool,
    ) -> ListenerId {
        let watcher = AlertWatcher::new(filter, Box::new(handler), is_one_shot);
        let id = self.alert_watchers.write().await.insert(watcher);
        self.system_event_sender
            .send(SystemEvent::ListenerAdded { id })
            .ok();
        id
    }

    /// Removes an alert handler.
    ///
    /// Returns `true` if the handler was found and removed.
    pub async fn remove_alert_listener(&self, id: ListenerId) -> bool {
        let was_removed = self.alert_watchers.write().await.remove(id).is_some();
        if was_removed {
            self.system_event_sender
                .send(SystemEvent::ListenerRemoved { id })
                .ok();
        }
        was_removed
    }

    /// Subscribes to the `AlertEvent` stream.
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertEvent> {
        self.alert_sender.subscribe()
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }
}

/// Waits for the next tick, or forever when no ticker is armed.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
