//! Contains common, primitive types and id helpers.
//!
//! Timers, categories and log entries are identified by plain strings so the
//! persisted snapshot stays readable and stable across sessions. The newtypes
//! below keep the three id spaces from being mixed up at compile time.
//! Alert listeners live only for the lifetime of an engine and use `slotmap`
//! keys instead.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Uniquely and safely identifies a registered alert listener within the engine.
    ///
    /// Keys are never reused, so a stale id cannot remove someone else's listener.
    pub struct ListenerId;
}

/// The current time, cut to the millisecond precision snapshots store.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        string_id!($(#[$meta])* $name);

        impl $name {
            /// Builds a time-based id of the form `<prefix>_<epoch millis>`.
            pub fn from_time(at: DateTime<Utc>) -> Self {
                Self(format!("{}_{}", $prefix, at.timestamp_millis()))
            }
        }
    };
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifies a timer. User-created timers get `timer_<millis>`.
    TimerId,
    "timer"
);

string_id!(
    /// Identifies a category. The built-in ones are `category_work`,
    /// `category_personal` and `category_fitness`.
    CategoryId,
    "category"
);

string_id!(
    /// Identifies a history entry.
    LogId
);

impl LogId {
    /// Log ids carry the timer id as well, so two timers finishing within the
    /// same millisecond still produce distinct entries.
    pub fn for_completion(timer_id: &TimerId, at: DateTime<Utc>) -> Self {
        Self(format!("log_{}_{}", at.timestamp_millis(), timer_id))
    }
}
