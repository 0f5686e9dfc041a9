use std::str::FromStr;

use kernel::model::{id::UserId, role::Role, user::User};
use shared::error::AppError;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            name,
            email,
            role,
        } = value;
        let role = Role::from_str(&role)
            .map_err(|_| AppError::ConversionEntityError(format!("unknown role: {role}")))?;
        Ok(Self {
            id: UserId::from(user_id),
            name,
            email,
            role,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct UserPasswordRow {
    pub user_id: Uuid,
    pub password_hash: String,
}
