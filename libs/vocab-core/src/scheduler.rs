//! Due date calculation for the fixed interval ladder.
//!
//! All arithmetic adds whole 24 hour blocks (86 400 000 ms) to a UTC instant
//! and then keeps only the calendar date. There is no calendar-aware month
//! logic and no daylight-saving compensation.

use crate::error::{Result, ScheduleError};
use crate::types::{ReviewIntervals, ReviewStatus};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

const MS_PER_DAY: i64 = 86_400_000;

/// Due date for a card created directly at `status`.
///
/// New cards are due immediately, Known cards never.
pub fn initial_due_date(
    status: ReviewStatus,
    intervals: &ReviewIntervals,
    now: DateTime<Utc>,
) -> Option<NaiveDate> {
    match status {
        ReviewStatus::Known => None,
        ReviewStatus::New => Some(now.date_naive()),
        other => intervals
            .days_for(other)
            .map(|days| add_days(now, days).date_naive()),
    }
}

/// Due date after a review (or status edit) anchored at `reference`.
///
/// Unlike [`initial_due_date`] there is no same-day case: every status below
/// Known adds its interval.
pub fn next_due_date(
    status: ReviewStatus,
    reference: DateTime<Utc>,
    intervals: &ReviewIntervals,
) -> Option<NaiveDate> {
    intervals
        .days_for(status)
        .map(|days| add_days(reference, days).date_naive())
}

/// String entry point for [`next_due_date`].
///
/// The caller is responsible for resolving a reference date; an empty string
/// is rejected rather than treated as "never reviewed".
pub fn next_due_date_from_str(
    status: ReviewStatus,
    reference: &str,
    intervals: &ReviewIntervals,
) -> Result<Option<NaiveDate>> {
    let reference = parse_reference_date(reference)?;
    Ok(next_due_date(status, reference, intervals))
}

/// Parse a `YYYY-MM-DD` date (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_reference_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::InvalidReferenceDate(value.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| ScheduleError::InvalidReferenceDate(value.to_string()))
}

/// Add `days` fixed-length days to an instant.
pub fn add_days(from: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    from + Duration::milliseconds(i64::from(days) * MS_PER_DAY)
}

/// Midnight UTC on `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Render a due date as `YYYY-MM-DD`, or an empty string for none.
pub fn due_date_string(due: Option<NaiveDate>) -> String {
    due.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
