//! Decides what one tick does to the running timers.
//!
//! Planning works on a single snapshot: every running timer is judged against
//! the same state, so the outcome for one timer never depends on another
//! timer's update within the same tick.

use crate::events::AlertEvent;
use crate::model::{Timer, TimerState};
use crate::store::Action;

/// The actions and alerts produced by one tick, in the order they must be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickPlan {
    pub actions: Vec<Action>,
    pub alerts: Vec<AlertEvent>,
}

impl TickPlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Plans one tick over every running timer in `state`.
pub fn plan(state: &TimerState) -> TickPlan {
    let mut plan = TickPlan::default();
    for timer in state.running_timers() {
        plan_timer(timer, &mut plan);
    }
    plan
}

fn plan_timer(timer: &Timer, plan: &mut TickPlan) {
    if timer.remaining_time <= 1 {
        plan.actions.push(Action::CompleteTimer(timer.id.clone()));
        plan.alerts.push(AlertEvent::TimerCompleted {
            timer_id: timer.id.clone(),
            timer_name: timer.name.clone(),
        });
    } else if timer.halfway_alert
        && !timer.halfway_alert_triggered
        && timer.remaining_time <= timer.halfway_point()
    {
        // The flag is set instead of counting down; this tick does not decrement.
        plan.actions.push(Action::UpdateTimer(Timer {
            halfway_alert_triggered: true,
            ..timer.clone()
        }));
        plan.alerts.push(AlertEvent::HalfwayPoint {
            timer_id: timer.id.clone(),
            timer_name: timer.name.clone(),
        });
    } else {
        plan.actions.push(Action::UpdateTimer(Timer {
            remaining_time: timer.remaining_time - 1,
            ..timer.clone()
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimerStatus;
    use chrono::Utc;

    fn running(id: &str, duration: u64, remaining: u64, halfway: bool) -> Timer {
        let mut timer = Timer::new(id, id, duration, "cat", Utc::now()).with_halfway_alert(halfway);
        timer.remaining_time = remaining;
        timer.status = TimerStatus::Running;
        timer
    }

    fn state_of(timers: Vec<Timer>) -> TimerState {
        TimerState {
            timers,
            ..TimerState::default()
        }
    }

    #[test]
    fn paused_and_completed_timers_are_skipped() {
        let mut paused = running("p", 10, 10, false);
        paused.status = TimerStatus::Paused;
        let mut done = running("d", 10, 0, false);
        done.status = TimerStatus::Completed;
        assert!(plan(&state_of(vec![paused, done])).is_empty());
    }

    #[test]
    fn last_second_completes_and_alerts() {
        let plan = plan(&state_of(vec![running("a", 10, 1, false)]));
        assert_eq!(plan.actions, vec![Action::CompleteTimer("a".into())]);
        assert!(matches!(plan.alerts.as_slice(), [AlertEvent::TimerCompleted { .. }]));
    }

    #[test]
    fn halfway_sets_flag_without_decrementing() {
        let plan = plan(&state_of(vec![running("a", 10, 5, true)]));
        match &plan.actions[..] {
            [Action::UpdateTimer(t)] => {
                assert!(t.halfway_alert_triggered);
                assert_eq!(t.remaining_time, 5);
            }
            other => panic!("unexpected actions {other:?}"),
        }
        assert!(matches!(plan.alerts.as_slice(), [AlertEvent::HalfwayPoint { .. }]));
    }

    #[test]
    fn halfway_waits_until_floor_of_half_duration() {
        // duration 9: the halfway point is 4, so 5 still counts down.
        let plan = plan(&state_of(vec![running("a", 9, 5, true)]));
        match &plan.actions[..] {
            [Action::UpdateTimer(t)] => assert_eq!(t.remaining_time, 4),
            other => panic!("unexpected actions {other:?}"),
        }
        assert!(plan.alerts.is_empty());
    }

    #[test]
    fn triggered_or_disabled_halfway_just_counts_down() {
        let mut triggered = running("a", 10, 4, true);
        triggered.halfway_alert_triggered = true;
        let disabled = running("b", 10, 4, false);
        let plan = plan(&state_of(vec![triggered, disabled]));
        assert!(plan.alerts.is_empty());
        for action in &plan.actions {
            match action {
                Action::UpdateTimer(t) => assert_eq!(t.remaining_time, 3),
                other => panic!("unexpected action {other:?}"),
            }
        }
    }

    #[test]
    fn all_running_timers_are_planned_in_order() {
        let plan = plan(&state_of(vec![
            running("a", 10, 1, false),
            running("b", 10, 8, false),
            running("c", 4, 2, true),
        ]));
        assert_eq!(plan.actions.len(), 3);
        assert_eq!(plan.actions[0], Action::CompleteTimer("a".into()));
        assert_eq!(plan.alerts.len(), 2);
        assert_eq!(plan.alerts[1].timer_id().as_str(), "c");
    }
}
