//! Turns raw user input into new timers and categories.
//!
//! Invalid input yields `None` and nothing is created.

use crate::common::{CategoryId, TimerId};
use crate::model::{Category, Timer};
use chrono::{DateTime, Utc};

/// The fields of the "add timer" form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerDraft {
    pub name: String,
    /// Duration in seconds, still as text.
    pub duration: String,
    pub category_id: String,
    pub halfway_alert: bool,
}

impl TimerDraft {
    /// Whether the form could be submitted.
    pub fn is_submittable(&self) -> bool {
        self.parsed_duration().is_some() && !self.name.is_empty() && !self.category_id.is_empty()
    }

    /// Builds a paused timer with a fresh time-based id, if the input is valid.
    pub fn into_timer(self, now: DateTime<Utc>) -> Option<Timer> {
        if !self.is_submittable() {
            return None;
        }
        let duration = self.parsed_duration()?;
        let timer = Timer::new(
            TimerId::from_time(now),
            self.name,
            duration,
            CategoryId::from(self.category_id),
            now,
        );
        Some(timer.with_halfway_alert(self.halfway_alert))
    }

    fn parsed_duration(&self) -> Option<u64> {
        match self.duration.trim().parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(seconds) => Some(seconds),
        }
    }
}

/// The fields of the "new category" input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    /// Builds an expanded category with a fresh time-based id, if a name was given.
    pub fn into_category(self, now: DateTime<Utc>) -> Option<Category> {
        if self.name.is_empty() {
            return None;
        }
        Some(Category::new(CategoryId::from_time(now), self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimerStatus;
    use chrono::TimeZone;

    fn draft(name: &str, duration: &str, category: &str) -> TimerDraft {
        TimerDraft {
            name: name.into(),
            duration: duration.into(),
            category_id: category.into(),
            halfway_alert: true,
        }
    }

    #[test]
    fn valid_draft_becomes_paused_timer() {
        let now = Utc.timestamp_millis_opt(1_234).unwrap();
        let timer = draft("Focus", "1500", "category_work").into_timer(now).unwrap();
        assert_eq!(timer.id.as_str(), "timer_1234");
        assert_eq!(timer.duration, 1500);
        assert_eq!(timer.remaining_time, 1500);
        assert_eq!(timer.status, TimerStatus::Paused);
        assert_eq!(timer.created_at, now);
        assert!(timer.halfway_alert);
        assert!(!timer.halfway_alert_triggered);
    }

    #[test]
    fn invalid_drafts_are_rejected() {
        let now = Utc::now();
        for bad in [
            draft("", "60", "category_work"),
            draft("Focus", "", "category_work"),
            draft("Focus", "60", ""),
            draft("Focus", "0", "category_work"),
            draft("Focus", "-5", "category_work"),
            draft("Focus", "ten", "category_work"),
        ] {
            assert!(!bad.is_submittable(), "{bad:?}");
            assert!(bad.into_timer(now).is_none());
        }
    }

    #[test]
    fn category_draft_needs_a_name() {
        let now = Utc.timestamp_millis_opt(77).unwrap();
        assert!(CategoryDraft::default().into_category(now).is_none());
        let category = CategoryDraft { name: "Chores".into() }.into_category(now).unwrap();
        assert_eq!(category.id.as_str(), "category_77");
        assert!(category.expanded);
    }
}
