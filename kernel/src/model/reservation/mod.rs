use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{AsRefStr, EnumString};

use super::{
    book::BookSummary,
    id::{ReservationId, UserId},
};

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Fulfilled,
    Cancelled,
}

#[derive(Debug)]
pub struct Reservation {
    pub id: ReservationId,
    pub reserved_by: UserId,
    pub book: BookSummary,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

/// Queue order within one book: earliest reservation first, ties broken by id
/// (v7 ids, so identity order is creation order). The adapter mirrors this as
/// `ORDER BY reserved_at, reservation_id`.
pub fn queue_order(
    a: &(DateTime<Utc>, ReservationId),
    b: &(DateTime<Utc>, ReservationId),
) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn earlier_reservation_wins_the_queue() {
        let first = (
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            ReservationId::new(),
        );
        let second = (
            Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap(),
            ReservationId::new(),
        );
        assert_eq!(queue_order(&first, &second), Ordering::Less);
    }

    #[test]
    fn same_instant_falls_back_to_creation_order() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let first = (at, ReservationId::new());
        let second = (at, ReservationId::new());
        assert_eq!(queue_order(&first, &second), Ordering::Less);
        assert_eq!(queue_order(&second, &first), Ordering::Greater);
    }
}
