//! Defines all public event types broadcast by the timer engine.
//!
//! Listeners subscribe to these strongly-typed streams to show alerts or to
//! follow what the engine is doing.

use crate::common::{ListenerId, TimerId};
use tokio::time::Instant;

/// A user-facing notice raised by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    /// A timer ran down to zero and was completed.
    TimerCompleted { timer_id: TimerId, timer_name: String },
    /// A timer with the halfway alert enabled crossed half its duration.
    HalfwayPoint { timer_id: TimerId, timer_name: String },
}

impl AlertEvent {
    pub fn timer_id(&self) -> &TimerId {
        match self {
            AlertEvent::TimerCompleted { timer_id, .. } | AlertEvent::HalfwayPoint { timer_id, .. } => timer_id,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertEvent::TimerCompleted { .. } => "Timer Completed!",
            AlertEvent::HalfwayPoint { .. } => "Halfway Point!",
        }
    }

    pub fn message(&self) -> String {
        match self {
            AlertEvent::TimerCompleted { timer_name, .. } => {
                format!("Congratulations! Your \"{}\" timer has completed.", timer_name)
            }
            AlertEvent::HalfwayPoint { timer_name, .. } => {
                format!("You're halfway through your \"{}\" timer!", timer_name)
            }
        }
    }
}

/// Events related to the lifecycle and state of the engine itself.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Fired once when the engine's `run` loop begins.
    EngineStarted { timestamp: Instant },
    /// Fired once when the engine's `run` loop is about to exit.
    EngineShutdown,
    /// Fired when the ticker is (re)armed because timers are running.
    TickerStarted { running: usize },
    /// Fired when the ticker is torn down because nothing is running.
    TickerStopped,
    /// Fired after each tick with the number of timers it advanced.
    Ticked { tick_count: u64, advanced: usize },
    /// Fired when a new alert listener is added.
    ListenerAdded { id: ListenerId },
    /// Fired when an alert listener is removed.
    ListenerRemoved { id: ListenerId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_texts_name_the_timer() {
        let done = AlertEvent::TimerCompleted {
            timer_id: "timer_1".into(),
            timer_name: "Tea".into(),
        };
        assert_eq!(done.title(), "Timer Completed!");
        assert_eq!(done.message(), "Congratulations! Your \"Tea\" timer has completed.");

        let half = AlertEvent::HalfwayPoint {
            timer_id: "timer_1".into(),
            timer_name: "Tea".into(),
        };
        assert_eq!(half.title(), "Halfway Point!");
        assert_eq!(half.message(), "You're halfway through your \"Tea\" timer!");
        assert_eq!(half.timer_id().as_str(), "timer_1");
    }
}
