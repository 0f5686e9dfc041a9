use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    book::{
        event::{CreateBook, DeleteBook, UpdateBook},
        Book, BookListOptions,
    },
    id::BookId,
    list::PaginatedList,
};

#[mockall::automock]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(&self, event: CreateBook) -> AppResult<BookId>;
    async fn find_all(&self, options: BookListOptions) -> AppResult<PaginatedList<Book>>;
    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>>;
    // Keyword match over title, author, isbn and category.
    async fn search(&self, keyword: &str) -> AppResult<Vec<Book>>;
    async fn find_categories(&self) -> AppResult<Vec<String>>;
    async fn update(&self, event: UpdateBook) -> AppResult<()>;
    async fn delete(&self, event: DeleteBook) -> AppResult<()>;
    async fn count(&self) -> AppResult<i64>;
}
