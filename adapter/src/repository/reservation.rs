use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{BookId, ReservationId, UserId},
        reservation::{
            event::{CancelReservation, CreateReservation},
            Reservation,
        },
    },
    repository::reservation::ReservationRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::reservation::ReservationRow, ConnectionPool};

const RESERVATION_COLUMNS: &str = r#"
    r.reservation_id,
    r.user_id,
    r.book_id,
    b.title,
    b.author,
    b.isbn,
    r.reserved_at,
    r.status
"#;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn reserve(&self, event: CreateReservation) -> AppResult<Reservation> {
        let reservation_id = ReservationId::new();
        sqlx::query(
            r#"
                INSERT INTO reservations (reservation_id, user_id, book_id, reserved_at, status)
                VALUES ($1, $2, $3, $4, 'ACTIVE')
            "#,
        )
        .bind(reservation_id.raw())
        .bind(event.reserved_by.raw())
        .bind(event.book_id.raw())
        .bind(event.reserved_at)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            // One ACTIVE reservation per (user, book); the partial unique
            // index turns a concurrent duplicate into this violation.
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::ResourceConflict(
                    "an active reservation for this book already exists".into(),
                )
            }
            e => AppError::SpecificOperationError(e),
        })?;

        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations r
                INNER JOIN books b ON b.book_id = r.book_id
                WHERE r.reservation_id = $1
            "#
        ))
        .bind(reservation_id.raw())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        row.try_into()
    }

    async fn cancel(&self, event: CancelReservation) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = 'CANCELLED', updated_at = now()
                WHERE user_id = $1 AND book_id = $2 AND status = 'ACTIVE'
            "#,
        )
        .bind(event.reserved_by.raw())
        .bind(event.book_id.raw())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            // Also hit when cancelling twice: the second attempt finds no
            // ACTIVE row and must not report success.
            return Err(AppError::EntityNotFound("active reservation not found".into()));
        }
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations r
                INNER JOIN books b ON b.book_id = r.book_id
                WHERE r.user_id = $1
                ORDER BY r.reserved_at DESC
            "#
        ))
        .bind(user_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_queue_head(&self, book_id: BookId) -> AppResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations r
                INNER JOIN books b ON b.book_id = r.book_id
                WHERE r.book_id = $1 AND r.status = 'ACTIVE'
                ORDER BY r.reserved_at, r.reservation_id
                LIMIT 1
            "#
        ))
        .bind(book_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        row.map(TryInto::try_into).transpose()
    }
}
