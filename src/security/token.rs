//! Rotating daily token.
//!
//! The expected token is `<prefix>_<YYYY-MM-DD>_<weekday>` for the current
//! UTC date, e.g. `Aipex_2025-12-15_monday`. Anyone who knows the format can
//! compute it: this is a gate against accidental callers, not a credential.
//! The format is kept exactly as-is for compatibility with existing clients.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use serde::Serialize;

pub const DEFAULT_PREFIX: &str = "Aipex";

/// The token for one UTC day together with its component fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotatingToken {
    pub token: String,
    pub date: String,
    pub day: &'static str,
}

impl RotatingToken {
    /// Token for a given calendar date.
    pub fn for_date(prefix: &str, date: NaiveDate) -> Self {
        let date_str = date.format("%Y-%m-%d").to_string();
        let day = weekday_name(date.weekday());
        Self {
            token: format!("{}_{}_{}", prefix, date_str, day),
            date: date_str,
            day,
        }
    }

    /// Token for today (UTC).
    pub fn current(prefix: &str) -> Self {
        Self::for_date(prefix, Utc::now().date_naive())
    }

    /// Exact, case-sensitive comparison.
    pub fn matches(&self, presented: &str) -> bool {
        self.token == presented
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
