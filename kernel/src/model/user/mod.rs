use super::{id::UserId, role::Role};

pub mod event;

pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}
