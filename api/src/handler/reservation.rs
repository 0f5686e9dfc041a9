use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use kernel::model::{
    id::BookId,
    reservation::event::{CancelReservation, CreateReservation},
};
use registry::{AppRegistry, AppRegistryExt};
use shared::error::{AppError, AppResult};

use crate::{extractor::AuthorizedUser, model::reservation::ReservationResponse};

pub async fn reserve_book(
    user: AuthorizedUser,
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .book_repository()
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("book not found".into()))?;

    let reservation = registry
        .reservation_repository()
        .reserve(CreateReservation {
            reserved_by: user.id(),
            book_id,
            reserved_at: Utc::now(),
        })
        .await?;
    Ok(Json(reservation.into()))
}

pub async fn cancel_reservation(
    user: AuthorizedUser,
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .reservation_repository()
        .cancel(CancelReservation {
            reserved_by: user.id(),
            book_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reservation_history(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let reservations = registry
        .reservation_repository()
        .find_by_user_id(user.id())
        .await?;
    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}
