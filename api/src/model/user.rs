use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{event::CreateUser, User},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 8))]
    pub password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            name,
            email,
            password,
        } = value;
        Self {
            name,
            email,
            password,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            id,
            name,
            email,
            role,
        } = value;
        Self {
            id,
            name,
            email,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_rejects_a_short_password() {
        let req = CreateUserRequest {
            name: "Jo Reader".into(),
            email: "jo@example.com".into(),
            password: "short".into(),
        };
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn registration_rejects_a_malformed_email() {
        let req = CreateUserRequest {
            name: "Jo Reader".into(),
            email: "not-an-email".into(),
            password: "long-enough-secret".into(),
        };
        assert!(req.validate(&()).is_err());
    }
}
