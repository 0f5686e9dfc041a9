use chrono::{DateTime, Utc};
use kernel::model::{
    id::ReservationId,
    reservation::{Reservation, ReservationStatus},
};
use serde::Serialize;

use super::borrow::BorrowedBookResponse;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub book: BorrowedBookResponse,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            reserved_by: _,
            book,
            reserved_at,
            status,
        } = value;
        Self {
            id,
            book: book.into(),
            reserved_at,
            status,
        }
    }
}
