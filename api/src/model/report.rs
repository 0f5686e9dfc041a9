use kernel::model::{borrow::BorrowCount, id::BookId};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostBorrowedBookResponse {
    pub book_id: BookId,
    pub title: String,
    pub borrow_count: i64,
}

impl From<BorrowCount> for MostBorrowedBookResponse {
    fn from(value: BorrowCount) -> Self {
        let BorrowCount {
            book_id,
            title,
            borrow_count,
        } = value;
        Self {
            book_id,
            title,
            borrow_count,
        }
    }
}

/// Simple counts for the admin dashboard.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryReportResponse {
    pub total_books: i64,
    pub total_users: i64,
    pub active_borrows: i64,
    pub overdue_borrows: i64,
    pub most_borrowed_books: Vec<MostBorrowedBookResponse>,
}
