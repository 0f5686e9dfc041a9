use kernel::model::{
    book::{Book, BookSummary},
    id::BookId,
};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct BookRow {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub cover_image_url: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        let BookRow {
            book_id,
            title,
            author,
            isbn,
            category,
            cover_image_url,
            total_copies,
            available_copies,
        } = value;
        Self {
            id: BookId::from(book_id),
            title,
            author,
            isbn,
            category,
            cover_image_url,
            total_copies,
            available_copies,
        }
    }
}

pub(in crate::database) fn summary_from_parts(
    book_id: Uuid,
    title: String,
    author: String,
    isbn: String,
) -> BookSummary {
    BookSummary {
        id: BookId::from(book_id),
        title,
        author,
        isbn,
    }
}
