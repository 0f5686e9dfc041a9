use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    book::{event::DeleteBook, BookListOptions},
    id::BookId,
};
use registry::{AppRegistry, AppRegistryExt};
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::book::{
        BookListQuery, BookResponse, CreateBookRequest, PaginatedBookResponse, SearchQuery,
        UpdateBookRequest, UpdateBookRequestWithIds,
    },
};

pub async fn show_book_list(
    _user: AuthorizedUser,
    Query(query): Query<BookListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedBookResponse>> {
    let options = BookListOptions {
        limit: query.limit,
        offset: query.offset,
    };
    registry
        .book_repository()
        .find_all(options)
        .await
        .map(PaginatedBookResponse::from)
        .map(Json)
}

pub async fn show_book(
    _user: AuthorizedUser,
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookResponse>> {
    registry
        .book_repository()
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("book not found".into()))
        .map(BookResponse::from)
        .map(Json)
}

pub async fn search_books(
    _user: AuthorizedUser,
    Query(query): Query<SearchQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = registry.book_repository().search(&query.q).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

pub async fn show_categories(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<String>>> {
    registry.book_repository().find_categories().await.map(Json)
}

pub async fn register_book(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;
    registry.book_repository().create(req.into()).await?;
    Ok(StatusCode::CREATED)
}

pub async fn update_book(
    user: AuthorizedUser,
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;
    registry
        .book_repository()
        .update(UpdateBookRequestWithIds::new(book_id, req).into())
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete_book(
    user: AuthorizedUser,
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    registry
        .book_repository()
        .delete(DeleteBook { book_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
