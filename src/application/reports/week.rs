//! Report week windows
//!
//! Weeks run Monday 00:00:00.000 to Sunday 23:59:59.999, in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// The week `weeks_ago` weeks before the one containing `now`.
///
/// `Validation` when the window falls outside the calendar range.
pub fn week_range(weeks_ago: u32, now: DateTime<Utc>) -> DomainResult<WeekRange> {
    let out_of_range = || DomainError::Validation(format!("Week offset {} is out of range", weeks_ago));

    let target = Duration::try_weeks(i64::from(weeks_ago))
        .and_then(|back| now.checked_sub_signed(back))
        .ok_or_else(out_of_range)?
        .date_naive();
    let monday = target
        .checked_sub_signed(Duration::days(i64::from(
            target.weekday().num_days_from_monday(),
        )))
        .ok_or_else(out_of_range)?;
    let start = monday.and_time(NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_signed(Duration::days(7) - Duration::milliseconds(1))
        .ok_or_else(out_of_range)?;
    Ok(WeekRange { start, end })
}

/// A selectable report week
#[derive(Debug, Clone, PartialEq)]
pub struct WeekOption {
    pub value: u32,
    pub label: String,
    pub range: WeekRange,
}

/// The last `count` weeks, current week first, labelled `dd MMM - dd MMM yyyy`.
pub fn available_weeks(count: u32, now: DateTime<Utc>) -> Vec<WeekOption> {
    (0..count)
        .map_while(|value| week_range(value, now).ok().map(|range| (value, range)))
        .map(|(value, range)| {
            WeekOption {
                value,
                label: format!(
                    "{} - {}",
                    range.start.format("%d %b"),
                    range.end.format("%d %b %Y")
                ),
                range,
            }
        })
        .collect()
}
