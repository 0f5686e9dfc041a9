use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{BookId, UserId},
    reservation::{
        event::{CancelReservation, CreateReservation},
        Reservation,
    },
};

#[mockall::automock]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // Enqueue. At most one ACTIVE reservation per (user, book).
    async fn reserve(&self, event: CreateReservation) -> AppResult<Reservation>;
    // Cancel the pair's ACTIVE reservation; absent one, a not-found error.
    async fn cancel(&self, event: CancelReservation) -> AppResult<()>;
    // A user's reservations, most recent first.
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
    // Earliest ACTIVE reservation for the book, i.e. the FIFO head.
    async fn find_queue_head(&self, book_id: BookId) -> AppResult<Option<Reservation>>;
}
