use chrono::{DateTime, Utc};

use crate::model::id::{BookId, UserId};

#[derive(Debug)]
pub struct CreateBorrow {
    pub borrowed_by: UserId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ReturnBorrow {
    pub returned_by: UserId,
    pub book_id: BookId,
    pub returned_at: DateTime<Utc>,
}
