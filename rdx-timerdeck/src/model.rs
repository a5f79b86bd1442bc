//! Domain entities: timers, categories, history entries and the state that holds them.
//!
//! All types serialize with camelCase keys and epoch-millisecond timestamps,
//! which is the layout of the persisted snapshot.

use crate::common::{CategoryId, LogId, TimerId};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Category name recorded in the log when a timer's category no longer exists.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Lifecycle status of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerStatus {
    Running,
    Paused,
    Completed,
}

/// A named grouping of timers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub expanded: bool,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expanded: true,
        }
    }

    /// The categories seeded on first run, all expanded.
    pub fn defaults() -> Vec<Category> {
        vec![
            Category::new("category_work", "Work"),
            Category::new("category_personal", "Personal"),
            Category::new("category_fitness", "Fitness"),
        ]
    }
}

/// A user-defined countdown.
///
/// `duration` and `remaining_time` are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    pub duration: u64,
    pub remaining_time: u64,
    pub status: TimerStatus,
    pub category_id: CategoryId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub halfway_alert: bool,
    #[serde(default)]
    pub halfway_alert_triggered: bool,
}

impl Timer {
    /// Creates a paused timer with its full duration remaining.
    ///
    /// `created_at` is cut to milliseconds, the precision it is stored with.
    pub fn new(
        id: impl Into<TimerId>,
        name: impl Into<String>,
        duration: u64,
        category_id: impl Into<CategoryId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            remaining_time: duration,
            status: TimerStatus::Paused,
            category_id: category_id.into(),
            created_at: created_at.trunc_subsecs(3),
            completed_at: None,
            halfway_alert: false,
            halfway_alert_triggered: false,
        }
    }

    pub fn with_halfway_alert(mut self, enabled: bool) -> Self {
        self.halfway_alert = enabled;
        self
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// The remaining time at or below which the halfway alert fires.
    pub fn halfway_point(&self) -> u64 {
        self.duration / 2
    }

    /// Remaining share of the duration, in percent.
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        self.remaining_time as f64 / self.duration as f64 * 100.0
    }

    /// Returns this timer back at full duration, paused, with the halfway alert re-armed.
    pub(crate) fn reset(&self) -> Self {
        Self {
            remaining_time: self.duration,
            status: TimerStatus::Paused,
            halfway_alert_triggered: false,
            ..self.clone()
        }
    }
}

/// An immutable history entry, written when a timer completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerLog {
    pub id: LogId,
    pub timer_id: TimerId,
    pub timer_name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub completed_at: DateTime<Utc>,
    pub duration: u64,
}

/// Everything the store owns. Collections keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    #[serde(default)]
    pub timers: Vec<Timer>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub logs: Vec<TimerLog>,
}

impl TimerState {
    pub fn timer(&self, id: &TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| &t.id == id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Timers of one category, in insertion order.
    pub fn timers_in<'a>(&'a self, category_id: &'a CategoryId) -> impl Iterator<Item = &'a Timer> + 'a {
        self.timers.iter().filter(move |t| &t.category_id == category_id)
    }

    pub fn running_timers(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter().filter(|t| t.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn timer_serializes_with_camel_case_and_millis() {
        let timer = Timer::new("timer_1", "Tea", 180, "category_work", at(1_000)).with_halfway_alert(true);
        let value = serde_json::to_value(&timer).unwrap();
        assert_eq!(value["remainingTime"], 180);
        assert_eq!(value["categoryId"], "category_work");
        assert_eq!(value["createdAt"], 1_000);
        assert_eq!(value["status"], "Paused");
        assert_eq!(value["halfwayAlert"], true);
        assert!(value.get("completedAt").is_none());
    }

    #[test]
    fn missing_halfway_flags_default_to_false() {
        let json = r#"{
            "id": "timer_9", "name": "Run", "duration": 60, "remainingTime": 0,
            "status": "Completed", "categoryId": "category_fitness",
            "createdAt": 5, "completedAt": 65000
        }"#;
        let timer: Timer = serde_json::from_str(json).unwrap();
        assert!(!timer.halfway_alert);
        assert!(!timer.halfway_alert_triggered);
        assert_eq!(timer.completed_at, Some(at(65_000)));
    }

    #[test]
    fn creation_time_is_kept_to_the_millisecond() {
        let precise = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let timer = Timer::new("t", "x", 5, "c", precise);
        assert_eq!(timer.created_at, at(1_700_000_000_123));
    }

    #[test]
    fn halfway_point_uses_floor_division() {
        let timer = Timer::new("t", "odd", 9, "c", at(0));
        assert_eq!(timer.halfway_point(), 4);
    }

    #[test]
    fn progress_is_remaining_share() {
        let mut timer = Timer::new("t", "p", 200, "c", at(0));
        timer.remaining_time = 50;
        assert_eq!(timer.progress(), 25.0);
    }

    #[test]
    fn default_categories_are_expanded() {
        let defaults = Category::defaults();
        let names: Vec<_> = defaults.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Work", "Personal", "Fitness"]);
        assert!(defaults.iter().all(|c| c.expanded));
    }
}
