use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

use crate::model::{
    borrow::{
        event::{CreateBorrow, ReturnBorrow},
        BorrowCount, BorrowRecord,
    },
    id::UserId,
};

#[mockall::automock]
#[async_trait]
pub trait BorrowRepository: Send + Sync {
    // Borrow operation. Runs the whole admission sequence (availability,
    // duplicate borrow, reservation priority, reservation fulfillment,
    // decrement, record insert) as one transaction.
    async fn borrow(&self, event: CreateBorrow) -> AppResult<BorrowRecord>;
    // Return operation. Finalizes the fine and frees a copy.
    async fn return_book(&self, event: ReturnBorrow) -> AppResult<BorrowRecord>;
    // A user's full borrow history, most recent first.
    async fn find_history_by_user_id(&self, user_id: UserId) -> AppResult<Vec<BorrowRecord>>;
    // Open records whose borrow date is at or before `as_of` minus the loan
    // period, recomputed from dates rather than the stored status.
    async fn find_overdue_all(&self, as_of: NaiveDate) -> AppResult<Vec<BorrowRecord>>;
    async fn count_active(&self) -> AppResult<i64>;
    async fn count_overdue(&self, as_of: NaiveDate) -> AppResult<i64>;
    async fn find_most_borrowed(&self, limit: i64) -> AppResult<Vec<BorrowCount>>;
}
