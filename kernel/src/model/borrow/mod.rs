use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use strum::{AsRefStr, EnumString};

use super::{
    book::BookSummary,
    fine,
    id::{BookId, BorrowId, UserId},
};

pub mod event;

/// Stored status of a borrow record. `Overdue` exists as a wire/report value
/// but is never persisted: the store only writes `Borrowed` and `Returned`,
/// and overdue-ness is recomputed from dates every time it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorrowStatus {
    Borrowed,
    Overdue,
    Returned,
}

#[derive(Debug)]
pub struct BorrowRecord {
    pub id: BorrowId,
    pub borrowed_by: UserId,
    pub book: BookSummary,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
    pub fine_amount: Decimal,
    pub fine_paid: bool,
}

impl BorrowRecord {
    pub fn due_date(&self) -> NaiveDate {
        fine::due_date(self.borrowed_at.date_naive())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != BorrowStatus::Returned
            && fine::days_overdue(self.borrowed_at.date_naive(), today) > 0
    }

    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.status == BorrowStatus::Returned {
            0
        } else {
            fine::days_overdue(self.borrowed_at.date_naive(), today)
        }
    }

    /// Accrued fine as of `today`. Finalized records keep the amount stored at
    /// return time; open records accrue day by day.
    pub fn current_fine(&self, today: NaiveDate) -> Decimal {
        if self.status == BorrowStatus::Returned {
            self.fine_amount
        } else {
            fine::fine_amount(self.borrowed_at.date_naive(), today)
        }
    }

    /// Status projected onto `today`. The stored field never holds `Overdue`;
    /// the projection is the only place it appears.
    pub fn status_as_of(&self, today: NaiveDate) -> BorrowStatus {
        if self.status == BorrowStatus::Returned {
            BorrowStatus::Returned
        } else if self.is_overdue(today) {
            BorrowStatus::Overdue
        } else {
            BorrowStatus::Borrowed
        }
    }
}

/// (book, borrow count) pair for the most-borrowed report.
#[derive(Debug)]
pub struct BorrowCount {
    pub book_id: BookId,
    pub title: String,
    pub borrow_count: i64,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::id::BookId;

    fn record(borrowed_on: NaiveDate, status: BorrowStatus) -> BorrowRecord {
        BorrowRecord {
            id: BorrowId::new(),
            borrowed_by: UserId::new(),
            book: BookSummary {
                id: BookId::new(),
                title: "Domain Modeling Made Functional".into(),
                author: "Scott Wlaschin".into(),
                isbn: "978-1680502541".into(),
            },
            borrowed_at: Utc
                .from_utc_datetime(&borrowed_on.and_hms_opt(9, 0, 0).unwrap()),
            returned_at: None,
            status,
            fine_amount: Decimal::ZERO,
            fine_paid: false,
        }
    }

    #[test]
    fn open_record_projects_overdue_after_due_date() {
        let borrowed_on = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let record = record(borrowed_on, BorrowStatus::Borrowed);

        let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(record.due_date(), due);
        assert_eq!(record.status_as_of(due), BorrowStatus::Borrowed);

        let day_after = due.succ_opt().unwrap();
        assert_eq!(record.status_as_of(day_after), BorrowStatus::Overdue);
        assert_eq!(record.days_overdue(day_after), 1);
    }

    #[test]
    fn returned_record_is_never_overdue() {
        let borrowed_on = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let record = record(borrowed_on, BorrowStatus::Returned);

        let much_later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(!record.is_overdue(much_later));
        assert_eq!(record.status_as_of(much_later), BorrowStatus::Returned);
        // Finalized fine is the stored amount, not re-accrued.
        assert_eq!(record.current_fine(much_later), Decimal::ZERO);
    }
}
