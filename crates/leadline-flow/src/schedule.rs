// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Next-contact choices and the UTC day window.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use strum::{Display, EnumIter, EnumString};

/// When to contact a client next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum NextContactChoice {
    #[strum(serialize = "same")]
    Today,
    #[strum(serialize = "tomorrow")]
    Tomorrow,
    #[strum(serialize = "3days")]
    InThreeDays,
    #[strum(serialize = "none")]
    Unplanned,
}

impl NextContactChoice {
    /// Resolve the choice to `contact_hour:00` UTC on the target day.
    pub fn resolve(self, now: DateTime<Utc>, contact_hour: u32) -> Option<DateTime<Utc>> {
        let days = match self {
            NextContactChoice::Today => 0,
            NextContactChoice::Tomorrow => 1,
            NextContactChoice::InThreeDays => 3,
            NextContactChoice::Unplanned => return None,
        };
        let day = (now + Duration::days(days)).date_naive();
        let time = NaiveTime::from_hms_opt(contact_hour.min(23), 0, 0)?;
        Some(day.and_time(time).and_utc())
    }
}

/// `[00:00, next 00:00)` of the UTC day containing `now`.
pub fn day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 27, 21, 30, 0).unwrap()
    }

    #[test]
    fn tomorrow_is_next_day_at_contact_hour() {
        let at = NextContactChoice::Tomorrow.resolve(evening(), 12).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap());
    }

    #[test]
    fn today_keeps_the_date_even_when_the_hour_passed() {
        let at = NextContactChoice::Today.resolve(evening(), 12).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 2, 27, 12, 0, 0).unwrap());
    }

    #[test]
    fn three_days_crosses_month_end() {
        let at = NextContactChoice::InThreeDays.resolve(evening(), 9).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn unplanned_clears_the_date() {
        assert!(NextContactChoice::Unplanned.resolve(evening(), 12).is_none());
    }

    #[test]
    fn tokens_match_button_payloads() {
        assert_eq!(NextContactChoice::InThreeDays.to_string(), "3days");
        assert_eq!(
            NextContactChoice::from_str("same").unwrap(),
            NextContactChoice::Today
        );
    }

    #[test]
    fn day_window_is_half_open() {
        let (start, end) = day_window(evening());
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 2, 27, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap());
    }
}
