use axum::{extract::State, Json};
use chrono::Utc;
use registry::{AppRegistry, AppRegistryExt};
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        borrow::BorrowRecordResponse,
        report::{LibraryReportResponse, MostBorrowedBookResponse},
    },
};

const MOST_BORROWED_LIMIT: i64 = 10;

pub async fn overdue_records(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BorrowRecordResponse>>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    let today = Utc::now().date_naive();
    let records = registry
        .borrow_repository()
        .find_overdue_all(today)
        .await?;
    Ok(Json(
        records
            .into_iter()
            .map(|r| BorrowRecordResponse::new(r, today))
            .collect(),
    ))
}

pub async fn library_report(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<LibraryReportResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    let today = Utc::now().date_naive();
    let total_books = registry.book_repository().count().await?;
    let total_users = registry.user_repository().count().await?;
    let active_borrows = registry.borrow_repository().count_active().await?;
    let overdue_borrows = registry.borrow_repository().count_overdue(today).await?;
    let most_borrowed_books = registry
        .borrow_repository()
        .find_most_borrowed(MOST_BORROWED_LIMIT)
        .await?
        .into_iter()
        .map(MostBorrowedBookResponse::from)
        .collect();

    Ok(Json(LibraryReportResponse {
        total_books,
        total_users,
        active_borrows,
        overdue_borrows,
        most_borrowed_books,
    }))
}
