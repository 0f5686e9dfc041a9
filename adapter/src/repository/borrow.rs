use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use derive_new::new;
use kernel::{
    model::{
        borrow::{
            event::{CreateBorrow, ReturnBorrow},
            BorrowCount, BorrowRecord,
        },
        circulation::{self, BorrowCheck},
        fine::{self, LOAN_PERIOD_DAYS},
        id::{BorrowId, ReservationId, UserId},
    },
    repository::borrow::BorrowRepository,
};
use shared::error::{AppError, AppResult};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::{
    model::borrow::{BorrowCountRow, BorrowRecordRow},
    ConnectionPool,
};

const RECORD_COLUMNS: &str = r#"
    br.borrow_id,
    br.user_id,
    br.book_id,
    b.title,
    b.author,
    b.isbn,
    br.borrowed_at,
    br.returned_at,
    br.status,
    br.fine_amount,
    br.fine_paid
"#;

#[derive(new)]
pub struct BorrowRepositoryImpl {
    db: ConnectionPool,
}

impl BorrowRepositoryImpl {
    async fn fetch_record(conn: &mut PgConnection, borrow_id: BorrowId) -> AppResult<BorrowRecord> {
        let row = sqlx::query_as::<_, BorrowRecordRow>(&format!(
            r#"
                SELECT {RECORD_COLUMNS}
                FROM borrow_records br
                INNER JOIN books b ON b.book_id = br.book_id
                WHERE br.borrow_id = $1
            "#
        ))
        .bind(borrow_id.raw())
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::SpecificOperationError)?;
        row.try_into()
    }
}

#[async_trait]
impl BorrowRepository for BorrowRepositoryImpl {
    async fn borrow(&self, event: CreateBorrow) -> AppResult<BorrowRecord> {
        let mut tx = self.db.begin().await?;

        // Lock the book row for the whole transaction. Every mutation of the
        // availability counter goes through this lock, so two requests racing
        // for the last copy serialize here and only one sees it available.
        let available_copies = sqlx::query_scalar::<_, i32>(
            r#"
                SELECT available_copies
                FROM books
                WHERE book_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.book_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("book not found".into()))?;

        let active_borrows = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*)
                FROM borrow_records
                WHERE user_id = $1 AND book_id = $2 AND status <> 'RETURNED'
            "#,
        )
        .bind(event.borrowed_by.raw())
        .bind(event.book_id.raw())
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let queue_head = sqlx::query_scalar::<_, Uuid>(
            r#"
                SELECT user_id
                FROM reservations
                WHERE book_id = $1 AND status = 'ACTIVE'
                ORDER BY reserved_at, reservation_id
                LIMIT 1
            "#,
        )
        .bind(event.book_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let requester_reservation = sqlx::query_scalar::<_, Uuid>(
            r#"
                SELECT reservation_id
                FROM reservations
                WHERE user_id = $1 AND book_id = $2 AND status = 'ACTIVE'
            "#,
        )
        .bind(event.borrowed_by.raw())
        .bind(event.book_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let check = BorrowCheck {
            available_copies,
            has_active_borrow: active_borrows > 0,
            queue_head: queue_head.map(UserId::from),
            requester_reservation: requester_reservation.map(ReservationId::from),
        };
        let grant = circulation::authorize_borrow(event.borrowed_by, &check)?;

        if let Some(reservation_id) = grant.fulfills {
            let res = sqlx::query(
                r#"
                    UPDATE reservations
                    SET status = 'FULFILLED', updated_at = now()
                    WHERE reservation_id = $1 AND status = 'ACTIVE'
                "#,
            )
            .bind(reservation_id.raw())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if res.rows_affected() < 1 {
                return Err(AppError::NoRowAffectedError(
                    "reservation to fulfill has gone away".into(),
                ));
            }
        }

        // Guarded decrement. The WHERE clause re-states the availability rule
        // so the counter can never go negative even if the snapshot above were
        // wrong; the CHECK constraint on the table is the last line of defense.
        let res = sqlx::query(
            r#"
                UPDATE books
                SET available_copies = available_copies - 1, updated_at = now()
                WHERE book_id = $1 AND available_copies > 0
            "#,
        )
        .bind(event.book_id.raw())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::BookUnavailable("no available copies to borrow".into()));
        }

        let borrow_id = BorrowId::new();
        sqlx::query(
            r#"
                INSERT INTO borrow_records (borrow_id, user_id, book_id, borrowed_at, status)
                VALUES ($1, $2, $3, $4, 'BORROWED')
            "#,
        )
        .bind(borrow_id.raw())
        .bind(event.borrowed_by.raw())
        .bind(event.book_id.raw())
        .bind(event.borrowed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            // The partial unique index on open records backs up the duplicate
            // check above under concurrency.
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::ResourceConflict("this book is already borrowed by the user".into())
            }
            e => AppError::SpecificOperationError(e),
        })?;

        let record = Self::fetch_record(&mut *tx, borrow_id).await?;
        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(record)
    }

    async fn return_book(&self, event: ReturnBorrow) -> AppResult<BorrowRecord> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, BorrowRecordRow>(&format!(
            r#"
                SELECT {RECORD_COLUMNS}
                FROM borrow_records br
                INNER JOIN books b ON b.book_id = br.book_id
                WHERE br.user_id = $1 AND br.book_id = $2 AND br.status <> 'RETURNED'
                FOR UPDATE OF br
            "#
        ))
        .bind(event.returned_by.raw())
        .bind(event.book_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("no active borrow record found".into()))?;
        let record: BorrowRecord = row.try_into()?;

        // Finalize the fine from dates, not from any stored status.
        let fine_amount = fine::fine_amount(
            record.borrowed_at.date_naive(),
            event.returned_at.date_naive(),
        );

        let res = sqlx::query(
            r#"
                UPDATE borrow_records
                SET status = 'RETURNED',
                    returned_at = $2,
                    fine_amount = $3,
                    updated_at = now()
                WHERE borrow_id = $1
            "#,
        )
        .bind(record.id.raw())
        .bind(event.returned_at)
        .bind(fine_amount)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowAffectedError(
                "borrow record vanished during return".into(),
            ));
        }

        // Free a copy, capped at the total. Zero rows affected simply means
        // the shelf is already full, which is not an error.
        sqlx::query(
            r#"
                UPDATE books
                SET available_copies = available_copies + 1, updated_at = now()
                WHERE book_id = $1 AND available_copies < total_copies
            "#,
        )
        .bind(event.book_id.raw())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let record = Self::fetch_record(&mut *tx, record.id).await?;
        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(record)
    }

    async fn find_history_by_user_id(&self, user_id: UserId) -> AppResult<Vec<BorrowRecord>> {
        let rows = sqlx::query_as::<_, BorrowRecordRow>(&format!(
            r#"
                SELECT {RECORD_COLUMNS}
                FROM borrow_records br
                INNER JOIN books b ON b.book_id = br.book_id
                WHERE br.user_id = $1
                ORDER BY br.borrowed_at DESC
            "#
        ))
        .bind(user_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_overdue_all(&self, as_of: NaiveDate) -> AppResult<Vec<BorrowRecord>> {
        let cutoff = as_of - Days::new(LOAN_PERIOD_DAYS);
        let rows = sqlx::query_as::<_, BorrowRecordRow>(&format!(
            r#"
                SELECT {RECORD_COLUMNS}
                FROM borrow_records br
                INNER JOIN books b ON b.book_id = br.book_id
                WHERE br.status <> 'RETURNED' AND br.borrowed_at::date <= $1
                ORDER BY br.borrowed_at
            "#
        ))
        .bind(cutoff)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM borrow_records WHERE status <> 'RETURNED'",
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn count_overdue(&self, as_of: NaiveDate) -> AppResult<i64> {
        let cutoff = as_of - Days::new(LOAN_PERIOD_DAYS);
        sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*)
                FROM borrow_records
                WHERE status <> 'RETURNED' AND borrowed_at::date <= $1
            "#,
        )
        .bind(cutoff)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_most_borrowed(&self, limit: i64) -> AppResult<Vec<BorrowCount>> {
        let rows = sqlx::query_as::<_, BorrowCountRow>(
            r#"
                SELECT b.book_id, b.title, COUNT(*) AS borrow_count
                FROM borrow_records br
                INNER JOIN books b ON b.book_id = br.book_id
                GROUP BY b.book_id, b.title
                ORDER BY borrow_count DESC, b.title
                LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
