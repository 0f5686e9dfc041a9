use garde::Validate;
use kernel::model::{
    book::{
        event::{CreateBook, UpdateBook},
        Book,
    },
    id::BookId,
    list::PaginatedList,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub author: String,
    #[garde(length(min = 1))]
    pub isbn: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(skip)]
    pub cover_image_url: Option<String>,
    #[garde(range(min = 1))]
    pub total_copies: i32,
}

impl From<CreateBookRequest> for CreateBook {
    fn from(value: CreateBookRequest) -> Self {
        let CreateBookRequest {
            title,
            author,
            isbn,
            category,
            cover_image_url,
            total_copies,
        } = value;
        Self {
            title,
            author,
            isbn,
            category,
            cover_image_url,
            total_copies,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub author: String,
    #[garde(length(min = 1))]
    pub isbn: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(skip)]
    pub cover_image_url: Option<String>,
    #[garde(range(min = 1))]
    pub total_copies: i32,
}

pub struct UpdateBookRequestWithIds(BookId, UpdateBookRequest);

impl UpdateBookRequestWithIds {
    pub fn new(book_id: BookId, request: UpdateBookRequest) -> Self {
        Self(book_id, request)
    }
}

impl From<UpdateBookRequestWithIds> for UpdateBook {
    fn from(UpdateBookRequestWithIds(book_id, value): UpdateBookRequestWithIds) -> Self {
        let UpdateBookRequest {
            title,
            author,
            isbn,
            category,
            cover_image_url,
            total_copies,
        } = value;
        Self {
            book_id,
            title,
            author,
            isbn,
            category,
            cover_image_url,
            total_copies,
        }
    }
}

#[derive(Deserialize)]
pub struct BookListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

const DEFAULT_LIMIT: i64 = 20;
fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub cover_image_url: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl From<Book> for BookResponse {
    fn from(value: Book) -> Self {
        let Book {
            id,
            title,
            author,
            isbn,
            category,
            cover_image_url,
            total_copies,
            available_copies,
        } = value;
        Self {
            id,
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedBookResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<BookResponse>,
}

impl From<PaginatedList<Book>> for PaginatedBookResponse {
    fn from(value: PaginatedList<Book>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = value.map(BookResponse::from);
        Self {
            total,
            limit,
            offset,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateBookRequest {
        CreateBookRequest {
            title: "The Pragmatic Programmer".into(),
            author: "David Thomas".into(),
            isbn: "978-0135957059".into(),
            category: "Programming".into(),
            cover_image_url: None,
            total_copies: 3,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate(&()).is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let req = CreateBookRequest {
            title: "".into(),
            ..request()
        };
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn zero_copies_is_rejected() {
        let req = CreateBookRequest {
            total_copies: 0,
            ..request()
        };
        assert!(req.validate(&()).is_err());
    }
}
