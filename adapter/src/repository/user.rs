use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::UserId,
        role::Role,
        user::{event::CreateUser, User},
    },
    repository::user::UserRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;
        let role = Role::User;

        sqlx::query(
            r#"
                INSERT INTO users (user_id, name, email, password_hash, role)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id.raw())
        .bind(&event.name)
        .bind(&event.email)
        .bind(&password_hash)
        .bind(role.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::ResourceConflict("this email address is already registered".into())
            }
            e => AppError::SpecificOperationError(e),
        })?;

        Ok(User {
            id: user_id,
            name: event.name,
            email: event.email,
            role,
        })
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, name, email, role
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(current_user_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        row.map(User::try_from).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, name, email, role
                FROM users
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }
}
