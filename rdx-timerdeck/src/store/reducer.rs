//! The pure state transition function.
//!
//! `transition` consumes the previous state and returns the next one. It never
//! fails: actions that name a timer or category that does not exist leave the
//! state as it was.

use super::action::Action;
use crate::common::{now_millis, CategoryId, LogId, TimerId};
use crate::model::{Timer, TimerLog, TimerState, TimerStatus, UNKNOWN_CATEGORY};
use chrono::{DateTime, SubsecRound, Utc};

/// Applies `action` to `state`, stamping completions with the current time.
pub fn transition(state: TimerState, action: Action) -> TimerState {
    transition_at(state, action, now_millis())
}

/// Applies `action` to `state`, stamping completions with `now`.
pub fn transition_at(mut state: TimerState, action: Action, now: DateTime<Utc>) -> TimerState {
    match action {
        Action::AddTimer(timer) => state.timers.push(timer),
        Action::UpdateTimer(updated) => {
            if let Some(slot) = state.timers.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated;
            }
        }
        Action::DeleteTimer(id) => state.timers.retain(|t| t.id != id),
        Action::StartTimer(id) => set_status(&mut state, &id, TimerStatus::Running),
        Action::PauseTimer(id) => set_status(&mut state, &id, TimerStatus::Paused),
        Action::ResetTimer(id) => {
            for timer in state.timers.iter_mut().filter(|t| t.id == id) {
                *timer = timer.reset();
            }
        }
        Action::CompleteTimer(id) => return complete(state, &id, now),
        Action::StartCategoryTimers(category_id) => {
            for timer in in_category(&mut state, &category_id) {
                if timer.status != TimerStatus::Completed {
                    timer.status = TimerStatus::Running;
                }
            }
        }
        Action::PauseCategoryTimers(category_id) => {
            for timer in in_category(&mut state, &category_id) {
                if timer.status == TimerStatus::Running {
                    timer.status = TimerStatus::Paused;
                }
            }
        }
        Action::ResetCategoryTimers(category_id) => {
            for timer in in_category(&mut state, &category_id) {
                *timer = timer.reset();
            }
        }
        Action::AddCategory(category) => state.categories.push(category),
        Action::ToggleCategoryExpanded(id) => {
            if let Some(category) = state.categories.iter_mut().find(|c| c.id == id) {
                category.expanded = !category.expanded;
            }
        }
        Action::AddLog(log) => state.logs.push(log),
        Action::SetState(replacement) => return replacement,
    }
    state
}

fn set_status(state: &mut TimerState, id: &TimerId, status: TimerStatus) {
    if let Some(timer) = state.timers.iter_mut().find(|t| &t.id == id) {
        timer.status = status;
    }
}

fn in_category<'a>(
    state: &'a mut TimerState,
    category_id: &'a CategoryId,
) -> impl Iterator<Item = &'a mut Timer> + 'a {
    state
        .timers
        .iter_mut()
        .filter(move |t| &t.category_id == category_id)
}

fn complete(mut state: TimerState, id: &TimerId, now: DateTime<Utc>) -> TimerState {
    let now = now.trunc_subsecs(3);
    let Some(timer) = state.timers.iter_mut().find(|t| &t.id == id) else {
        return state;
    };
    timer.status = TimerStatus::Completed;
    timer.remaining_time = 0;
    timer.completed_at = Some(now);

    let category_name = state
        .categories
        .iter()
        .find(|c| c.id == timer.category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    let log = TimerLog {
        id: LogId::for_completion(&timer.id, now),
        timer_id: timer.id.clone(),
        timer_name: timer.name.clone(),
        category_id: timer.category_id.clone(),
        category_name,
        completed_at: now,
        duration: timer.duration,
    };
    state.logs.push(log);
    state
}
