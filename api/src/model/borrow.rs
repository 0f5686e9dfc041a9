use chrono::{DateTime, NaiveDate, Utc};
use kernel::model::{
    book::BookSummary,
    borrow::{BorrowRecord, BorrowStatus},
    id::{BookId, BorrowId},
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedBookResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl From<BookSummary> for BorrowedBookResponse {
    fn from(value: BookSummary) -> Self {
        let BookSummary {
            id,
            title,
            author,
            isbn,
        } = value;
        Self {
            id,
            title,
            author,
            isbn,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecordResponse {
    pub id: BorrowId,
    pub book: BorrowedBookResponse,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub due_date: NaiveDate,
    /// Projected onto the request date; a stale stored status never leaks out.
    pub status: BorrowStatus,
    pub days_overdue: i64,
    pub fine_amount: Decimal,
    pub fine_paid: bool,
}

impl BorrowRecordResponse {
    pub fn new(record: BorrowRecord, today: NaiveDate) -> Self {
        Self {
            id: record.id,
            due_date: record.due_date(),
            status: record.status_as_of(today),
            days_overdue: record.days_overdue(today),
            fine_amount: record.current_fine(today),
            fine_paid: record.fine_paid,
            borrowed_at: record.borrowed_at,
            returned_at: record.returned_at,
            book: record.book.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use kernel::model::id::UserId;

    use super::*;

    fn record() -> BorrowRecord {
        BorrowRecord {
            id: BorrowId::new(),
            borrowed_by: UserId::new(),
            book: BookSummary {
                id: BookId::new(),
                title: "Programming Rust".into(),
                author: "Jim Blandy".into(),
                isbn: "978-1492052593".into(),
            },
            borrowed_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            returned_at: None,
            status: BorrowStatus::Borrowed,
            fine_amount: Decimal::ZERO,
            fine_paid: false,
        }
    }

    #[test]
    fn response_projects_overdue_from_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let res = BorrowRecordResponse::new(record(), today);
        assert_eq!(res.status, BorrowStatus::Overdue);
        assert_eq!(res.days_overdue, 6);
        assert_eq!(res.fine_amount, Decimal::from(30));
    }

    #[test]
    fn response_within_loan_period_stays_borrowed() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let res = BorrowRecordResponse::new(record(), today);
        assert_eq!(res.status, BorrowStatus::Borrowed);
        assert_eq!(res.fine_amount, Decimal::ZERO);
    }

    #[test]
    fn response_serializes_in_camel_case() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let json =
            serde_json::to_value(BorrowRecordResponse::new(record(), today)).unwrap();
        assert_eq!(json["status"], "OVERDUE");
        assert_eq!(json["daysOverdue"], 6);
        assert_eq!(json["dueDate"], "2024-03-15");
        assert!(json["book"]["title"].is_string());
    }
}
