use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        book::{
            event::{CreateBook, DeleteBook, UpdateBook},
            Book, BookListOptions,
        },
        id::BookId,
        list::PaginatedList,
    },
    repository::book::BookRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::book::BookRow, ConnectionPool};

const BOOK_COLUMNS: &str = r#"
    book_id,
    title,
    author,
    isbn,
    category,
    cover_image_url,
    total_copies,
    available_copies
"#;

#[derive(new)]
pub struct BookRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn create(&self, event: CreateBook) -> AppResult<BookId> {
        let book_id = BookId::new();
        // A new title goes on the shelf with every copy available.
        sqlx::query(
            r#"
                INSERT INTO books
                    (book_id, title, author, isbn, category, cover_image_url,
                     total_copies, available_copies)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(book_id.raw())
        .bind(&event.title)
        .bind(&event.author)
        .bind(&event.isbn)
        .bind(&event.category)
        .bind(&event.cover_image_url)
        .bind(event.total_copies)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::ResourceConflict("a book with this isbn already exists".into())
            }
            e => AppError::SpecificOperationError(e),
        })?;
        Ok(book_id)
    }

    async fn find_all(&self, options: BookListOptions) -> AppResult<PaginatedList<Book>> {
        let BookListOptions { limit, offset } = options;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        let rows = sqlx::query_as::<_, BookRow>(&format!(
            r#"
                SELECT {BOOK_COLUMNS}
                FROM books
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items: rows.into_iter().map(Book::from).collect(),
        })
    }

    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
                SELECT {BOOK_COLUMNS}
                FROM books
                WHERE book_id = $1
            "#
        ))
        .bind(book_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(row.map(Book::from))
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            r#"
                SELECT {BOOK_COLUMNS}
                FROM books
                WHERE title ILIKE '%' || $1 || '%'
                   OR author ILIKE '%' || $1 || '%'
                   OR isbn ILIKE '%' || $1 || '%'
                   OR category ILIKE '%' || $1 || '%'
                ORDER BY title
            "#
        ))
        .bind(keyword)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_categories(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM books ORDER BY category")
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }

    async fn update(&self, event: UpdateBook) -> AppResult<()> {
        // Shrinking total_copies clamps available_copies down with it so the
        // counter invariant survives the edit.
        let res = sqlx::query(
            r#"
                UPDATE books
                SET title = $2,
                    author = $3,
                    isbn = $4,
                    category = $5,
                    cover_image_url = $6,
                    total_copies = $7,
                    available_copies = LEAST(available_copies, $7),
                    updated_at = now()
                WHERE book_id = $1
            "#,
        )
        .bind(event.book_id.raw())
        .bind(&event.title)
        .bind(&event.author)
        .bind(&event.isbn)
        .bind(&event.category)
        .bind(&event.cover_image_url)
        .bind(event.total_copies)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::ResourceConflict("a book with this isbn already exists".into())
            }
            e => AppError::SpecificOperationError(e),
        })?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("book not found".into()));
        }
        Ok(())
    }

    async fn delete(&self, event: DeleteBook) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(event.book_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("book not found".into()));
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }
}
