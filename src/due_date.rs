//! Display formatting for item due dates.
//!
//! Items overdue by more than the long-overdue window show no date at all.
//! Reserve items circulate by the hour, so their due date includes the time.

use crate::item::ReserveFlag;
use chrono::{Duration, NaiveDateTime};

/// Default long-overdue window in days.
pub const DEFAULT_LONG_OVERDUE_DAYS: i64 = 30;

/// Format a due date for display.
///
/// Returns `None` when there is no due date or it lies more than
/// `long_overdue_days` before `now`. A window too large to subtract from
/// `now` never hides a date. Reserve items render as
/// `M/D/YYYY H:MMam`, everything else as `M/D/YYYY`, without leading zeros
/// on month, day, or hour.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use marc_liberator::due_date::format_due_date;
/// use marc_liberator::item::ReserveFlag;
///
/// let now = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let due = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(9, 5, 0);
/// assert_eq!(format_due_date(due, ReserveFlag::No, now, 30).as_deref(), Some("3/5/2024"));
/// assert_eq!(format_due_date(due, ReserveFlag::Yes, now, 30).as_deref(), Some("3/5/2024 9:05am"));
/// ```
#[must_use]
pub fn format_due_date(
    due_date: Option<NaiveDateTime>,
    on_reserve: ReserveFlag,
    now: NaiveDateTime,
    long_overdue_days: i64,
) -> Option<String> {
    let due_date = due_date?;
    let cutoff = Duration::try_days(long_overdue_days).and_then(|w| now.checked_sub_signed(w));
    if cutoff.is_some_and(|cutoff| due_date < cutoff) {
        return None;
    }
    let pattern = if on_reserve.is_on_reserve() {
        "%-m/%-d/%Y %-I:%M%P"
    } else {
        "%-m/%-d/%Y"
    };
    Some(due_date.format(pattern).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_absent_due_date() {
        assert_eq!(format_due_date(None, ReserveFlag::No, now(), 30), None);
    }

    #[test]
    fn test_29_days_past_is_shown() {
        let due = now() - Duration::days(29);
        assert_eq!(
            format_due_date(Some(due), ReserveFlag::No, now(), 30).as_deref(),
            Some("5/17/2024")
        );
    }

    #[test]
    fn test_31_days_past_is_hidden() {
        let due = now() - Duration::days(31);
        assert_eq!(format_due_date(Some(due), ReserveFlag::No, now(), 30), None);
        assert_eq!(format_due_date(Some(due), ReserveFlag::Yes, now(), 30), None);
    }

    #[test]
    fn test_reserve_item_includes_time() {
        let due = NaiveDate::from_ymd_opt(2024, 7, 4)
            .and_then(|d| d.and_hms_opt(14, 7, 0))
            .unwrap();
        assert_eq!(
            format_due_date(Some(due), ReserveFlag::Yes, now(), 30).as_deref(),
            Some("7/4/2024 2:07pm")
        );
        assert_eq!(
            format_due_date(Some(due), ReserveFlag::No, now(), 30).as_deref(),
            Some("7/4/2024")
        );
    }

    #[test]
    fn test_midnight_and_noon() {
        let midnight = NaiveDate::from_ymd_opt(2024, 12, 1)
            .and_then(|d| d.and_hms_opt(0, 30, 0))
            .unwrap();
        assert_eq!(
            format_due_date(Some(midnight), ReserveFlag::Yes, now(), 30).as_deref(),
            Some("12/1/2024 12:30am")
        );
        let noon = midnight + Duration::hours(12);
        assert_eq!(
            format_due_date(Some(noon), ReserveFlag::Yes, now(), 30).as_deref(),
            Some("12/1/2024 12:30pm")
        );
    }

    #[test]
    fn test_custom_window() {
        let due = now() - Duration::days(10);
        assert_eq!(format_due_date(Some(due), ReserveFlag::No, now(), 7), None);
        assert!(format_due_date(Some(due), ReserveFlag::No, now(), 14).is_some());
    }

    #[test]
    fn test_unrepresentable_window_never_hides() {
        let due = now() - Duration::days(3650);
        assert_eq!(
            format_due_date(Some(due), ReserveFlag::No, now(), 100_000_000).as_deref(),
            Some("6/18/2014")
        );
        assert!(format_due_date(Some(due), ReserveFlag::No, now(), i64::MAX).is_some());
        assert!(format_due_date(Some(due), ReserveFlag::No, now(), i64::MIN).is_some());
    }
}
