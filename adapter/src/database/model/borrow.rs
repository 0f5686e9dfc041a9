use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::model::{
    borrow::{BorrowCount, BorrowRecord, BorrowStatus},
    id::{BookId, BorrowId, UserId},
};
use rust_decimal::Decimal;
use shared::error::AppError;
use uuid::Uuid;

use super::book::summary_from_parts;

#[derive(sqlx::FromRow)]
pub struct BorrowRecordRow {
    pub borrow_id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: String,
    pub fine_amount: Decimal,
    pub fine_paid: bool,
}

impl TryFrom<BorrowRecordRow> for BorrowRecord {
    type Error = AppError;

    fn try_from(value: BorrowRecordRow) -> Result<Self, Self::Error> {
        let BorrowRecordRow {
            borrow_id,
            user_id,
            book_id,
            title,
            author,
            isbn,
            borrowed_at,
            returned_at,
            status,
            fine_amount,
            fine_paid,
        } = value;
        let status = BorrowStatus::from_str(&status).map_err(|_| {
            AppError::ConversionEntityError(format!("unknown borrow status: {status}"))
        })?;
        Ok(Self {
            id: BorrowId::from(borrow_id),
            borrowed_by: UserId::from(user_id),
            book: summary_from_parts(book_id, title, author, isbn),
            borrowed_at,
            returned_at,
            status,
            fine_amount,
            fine_paid,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct BorrowCountRow {
    pub book_id: Uuid,
    pub title: String,
    pub borrow_count: i64,
}

impl From<BorrowCountRow> for BorrowCount {
    fn from(value: BorrowCountRow) -> Self {
        Self {
            book_id: BookId::from(value.book_id),
            title: value.title,
            borrow_count: value.borrow_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> BorrowRecordRow {
        BorrowRecordRow {
            borrow_id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            book_id: Uuid::now_v7(),
            title: "Refactoring".into(),
            author: "Martin Fowler".into(),
            isbn: "978-0134757599".into(),
            borrowed_at: Utc::now(),
            returned_at: None,
            status: status.into(),
            fine_amount: Decimal::ZERO,
            fine_paid: false,
        }
    }

    #[test]
    fn row_converts_with_known_status() {
        let record = BorrowRecord::try_from(row("BORROWED")).unwrap();
        assert_eq!(record.status, BorrowStatus::Borrowed);
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let result = BorrowRecord::try_from(row("LOST"));
        assert!(matches!(result, Err(AppError::ConversionEntityError(_))));
    }
}
