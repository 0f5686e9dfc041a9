use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use kernel::model::{
    borrow::event::{CreateBorrow, ReturnBorrow},
    id::BookId,
};
use registry::{AppRegistry, AppRegistryExt};
use shared::error::{AppError, AppResult};

use crate::{extractor::AuthorizedUser, model::borrow::BorrowRecordResponse};

pub async fn borrow_book(
    user: AuthorizedUser,
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BorrowRecordResponse>> {
    // Unknown book ids are a 404 before any circulation rule runs.
    registry
        .book_repository()
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("book not found".into()))?;

    let now = Utc::now();
    let record = registry
        .borrow_repository()
        .borrow(CreateBorrow {
            borrowed_by: user.id(),
            book_id,
            borrowed_at: now,
        })
        .await?;
    tracing::info!(
        user_id = %user.id(),
        book_id = %book_id,
        "book borrowed"
    );
    Ok(Json(BorrowRecordResponse::new(record, now.date_naive())))
}

pub async fn return_book(
    user: AuthorizedUser,
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BorrowRecordResponse>> {
    let now = Utc::now();
    let record = registry
        .borrow_repository()
        .return_book(ReturnBorrow {
            returned_by: user.id(),
            book_id,
            returned_at: now,
        })
        .await?;
    tracing::info!(
        user_id = %user.id(),
        book_id = %book_id,
        fine = %record.fine_amount,
        "book returned"
    );
    Ok(Json(BorrowRecordResponse::new(record, now.date_naive())))
}

pub async fn borrow_history(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BorrowRecordResponse>>> {
    let today = Utc::now().date_naive();
    let records = registry
        .borrow_repository()
        .find_history_by_user_id(user.id())
        .await?;
    Ok(Json(
        records
            .into_iter()
            .map(|r| BorrowRecordResponse::new(r, today))
            .collect(),
    ))
}
