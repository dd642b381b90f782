//! Pure day-eligibility rules for schedule generation.

use chrono::{Datelike, NaiveDate, Weekday};

/// Check whether a date falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Check whether one date is eligible for dose generation under the
/// course's skip policy.
pub fn is_eligible(date: NaiveDate, skip_weekends: bool, skip_dates: &[NaiveDate]) -> bool {
    if skip_weekends && is_weekend(date) {
        return false;
    }
    !skip_dates.contains(&date)
}

/// All eligible dates in `from..=to`, in order.
pub fn eligible_dates(
    from: NaiveDate,
    to: NaiveDate,
    skip_weekends: bool,
    skip_dates: &[NaiveDate],
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = from;
    while current <= to {
        if is_eligible(current, skip_weekends, skip_dates) {
            dates.push(current);
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}
