//! Fine arithmetic for overdue loans.
//!
//! Pure date math so the rules can be tested without a clock or a store.
//! Monetary amounts are `Decimal`; fines are whole currency units per day, and
//! float rounding must never creep into what gets persisted.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

/// Days a patron may keep a book before it is overdue.
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// Fine accrued per day overdue, in currency units.
pub const FINE_PER_DAY: i64 = 5;

pub fn due_date(borrowed_on: NaiveDate) -> NaiveDate {
    borrowed_on + Days::new(LOAN_PERIOD_DAYS)
}

/// Whole days past the due date; 0 on or before it. Overdue starts the day
/// *after* the due date, so returning exactly on day 14 costs nothing.
pub fn days_overdue(borrowed_on: NaiveDate, today: NaiveDate) -> i64 {
    let due = due_date(borrowed_on);
    if today > due {
        (today - due).num_days()
    } else {
        0
    }
}

pub fn fine_amount(borrowed_on: NaiveDate, today: NaiveDate) -> Decimal {
    Decimal::from(days_overdue(borrowed_on, today) * FINE_PER_DAY)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_is_fourteen_days_out() {
        assert_eq!(due_date(date(2024, 3, 1)), date(2024, 3, 15));
    }

    #[rstest]
    #[case::same_day(date(2024, 3, 1), 0)]
    #[case::on_due_date(date(2024, 3, 15), 0)]
    #[case::one_day_late(date(2024, 3, 16), 1)]
    #[case::six_days_late(date(2024, 3, 21), 6)]
    #[case::across_month_boundary(date(2024, 4, 1), 17)]
    fn days_overdue_counts_strictly_past_due(#[case] today: NaiveDate, #[case] expected: i64) {
        assert_eq!(days_overdue(date(2024, 3, 1), today), expected);
    }

    #[rstest]
    // Borrowed day D, returned D+20: 6 days over, 6 x 5 = 30.
    #[case::twenty_days(date(2024, 3, 21), Decimal::from(30))]
    #[case::on_time(date(2024, 3, 14), Decimal::ZERO)]
    #[case::due_day(date(2024, 3, 15), Decimal::ZERO)]
    fn fine_is_five_per_day(#[case] today: NaiveDate, #[case] expected: Decimal) {
        assert_eq!(fine_amount(date(2024, 3, 1), today), expected);
    }
}
