//! The actions the store understands.

use crate::common::{CategoryId, TimerId};
use crate::model::{Category, Timer, TimerLog, TimerState};

/// A single requested change to the timer state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddTimer(Timer),
    /// Replaces the timer with the same id. Ignored when no such timer exists.
    UpdateTimer(Timer),
    /// Removes a timer. Its history entries stay.
    DeleteTimer(TimerId),
    /// Sets `Running` without looking at the current status.
    StartTimer(TimerId),
    PauseTimer(TimerId),
    ResetTimer(TimerId),
    CompleteTimer(TimerId),
    /// Starts every timer of the category that has not completed.
    StartCategoryTimers(CategoryId),
    /// Pauses every running timer of the category.
    PauseCategoryTimers(CategoryId),
    ResetCategoryTimers(CategoryId),
    AddCategory(Category),
    ToggleCategoryExpanded(CategoryId),
    AddLog(TimerLog),
    /// Replaces the whole state. Used to hydrate from storage.
    SetState(TimerState),
}

impl Action {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddTimer(_) => "add_timer",
            Action::UpdateTimer(_) => "update_timer",
            Action::DeleteTimer(_) => "delete_timer",
            Action::StartTimer(_) => "start_timer",
            Action::PauseTimer(_) => "pause_timer",
            Action::ResetTimer(_) => "reset_timer",
            Action::CompleteTimer(_) => "complete_timer",
            Action::StartCategoryTimers(_) => "start_category_timers",
            Action::PauseCategoryTimers(_) => "pause_category_timers",
            Action::ResetCategoryTimers(_) => "reset_category_timers",
            Action::AddCategory(_) => "add_category",
            Action::ToggleCategoryExpanded(_) => "toggle_category_expanded",
            Action::AddLog(_) => "add_log",
            Action::SetState(_) => "set_state",
        }
    }
}
