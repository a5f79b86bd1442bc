//! Read-only views over the history log, for display.

use crate::model::TimerLog;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;

/// Distinct category names that appear in the log, sorted.
pub fn category_names(logs: &[TimerLog]) -> Vec<String> {
    logs.iter()
        .map(|log| log.category_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Logs matching `category_name` (or all of them), newest first.
pub fn filter_logs<'a>(logs: &'a [TimerLog], category_name: Option<&str>) -> Vec<&'a TimerLog> {
    let mut selected: Vec<&TimerLog> = logs
        .iter()
        .filter(|log| category_name.map_or(true, |name| log.category_name == name))
        .collect();
    selected.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    selected
}

/// Formats seconds as `mm:ss`. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Formats a timestamp for display in `tz`.
pub fn format_timestamp(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log(id: &str, category: &str, completed_secs: i64) -> TimerLog {
        TimerLog {
            id: id.into(),
            timer_id: "timer".into(),
            timer_name: id.into(),
            category_id: "c".into(),
            category_name: category.into(),
            completed_at: Utc.timestamp_opt(completed_secs, 0).unwrap(),
            duration: 60,
        }
    }

    #[test]
    fn category_names_are_distinct_and_sorted() {
        let logs = vec![log("1", "Work", 1), log("2", "Fitness", 2), log("3", "Work", 3)];
        assert_eq!(category_names(&logs), ["Fitness", "Work"]);
    }

    #[test]
    fn filtering_sorts_newest_first() {
        let logs = vec![log("old", "Work", 10), log("gym", "Fitness", 20), log("new", "Work", 30)];
        let all: Vec<_> = filter_logs(&logs, None).iter().map(|l| l.id.as_str()).collect();
        assert_eq!(all, ["new", "gym", "old"]);

        let work: Vec<_> = filter_logs(&logs, Some("Work")).iter().map(|l| l.id.as_str()).collect();
        assert_eq!(work, ["new", "old"]);
        assert!(filter_logs(&logs, Some("Nope")).is_empty());
    }

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn timestamps_render_in_the_configured_zone() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(at, Tz::UTC), "2026-01-01 12:00:00");
        assert_eq!(format_timestamp(at, chrono_tz::Asia::Tokyo), "2026-01-01 21:00:00");
    }
}
