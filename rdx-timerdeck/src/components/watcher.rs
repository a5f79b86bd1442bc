//! Defines watchers that react to alerts raised by the engine.

use crate::events::AlertEvent;

/// A callback invoked for every alert the engine raises.
pub type AlertHandler = Box<dyn FnMut(&AlertEvent) + Send + Sync>;

/// Which alerts a watcher wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertFilter {
    All,
    CompletedOnly,
    HalfwayOnly,
}

impl AlertFilter {
    fn accepts(&self, alert: &AlertEvent) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::CompletedOnly => matches!(alert, AlertEvent::TimerCompleted { .. }),
            AlertFilter::HalfwayOnly => matches!(alert, AlertEvent::HalfwayPoint { .. }),
        }
    }
}

/// Runs a handler for alerts that pass its filter.
#[doc(hidden)]
pub(crate) struct AlertWatcher {
    pub filter: AlertFilter,
    pub handler: AlertHandler,
    pub is_one_shot: bool,
}

impl AlertWatcher {
    /// Creates a new `AlertWatcher`.
    pub(crate) fn new(filter: AlertFilter, handler: AlertHandler, is_one_shot: bool) -> Self {
        Self {
            filter,
            handler,
            is_one_shot,
        }
    }

    /// Executes the handler if the alert passes the filter.
    /// Returns `true` if the handler ran.
    pub(crate) fn notify(&mut self, alert: &AlertEvent) -> bool {
        if self.filter.accepts(alert) {
            (self.handler)(alert);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn filter_limits_which_alerts_reach_the_handler() {
        let seen = Arc::new(AtomicU32::new(0));
        let counter = seen.clone();
        let mut watcher = AlertWatcher::new(
            AlertFilter::CompletedOnly,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
            false,
        );

        let halfway = AlertEvent::HalfwayPoint {
            timer_id: "t".into(),
            timer_name: "t".into(),
        };
        let completed = AlertEvent::TimerCompleted {
            timer_id: "t".into(),
            timer_name: "t".into(),
        };
        assert!(!watcher.notify(&halfway));
        assert!(watcher.notify(&completed));
        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }
}
