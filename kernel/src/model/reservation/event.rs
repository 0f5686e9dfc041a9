use chrono::{DateTime, Utc};

use crate::model::id::{BookId, UserId};

#[derive(Debug)]
pub struct CreateReservation {
    pub reserved_by: UserId,
    pub book_id: BookId,
    pub reserved_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CancelReservation {
    pub reserved_by: UserId,
    pub book_id: BookId,
}
