use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::model::{
    id::{ReservationId, UserId},
    reservation::{Reservation, ReservationStatus},
};
use shared::error::AppError;
use uuid::Uuid;

use super::book::summary_from_parts;

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub reserved_at: DateTime<Utc>,
    pub status: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            user_id,
            book_id,
            title,
            author,
            isbn,
            reserved_at,
            status,
        } = value;
        let status = ReservationStatus::from_str(&status).map_err(|_| {
            AppError::ConversionEntityError(format!("unknown reservation status: {status}"))
        })?;
        Ok(Self {
            id: ReservationId::from(reservation_id),
            reserved_by: UserId::from(user_id),
            book: summary_from_parts(book_id, title, author, isbn),
            reserved_at,
            status,
        })
    }
}
