use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::auth::event::CreateToken;
use registry::{AppRegistry, AppRegistryExt};
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::{
        auth::{AccessTokenResponse, LoginRequest},
        user::{CreateUserRequest, UserResponse},
    },
};

pub async fn register(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate(&())?;
    let user = registry.user_repository().create(req.into()).await?;
    Ok(Json(user.into()))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    let user_id = registry
        .auth_repository()
        .verify_user(&req.email, &req.password)
        .await?;
    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user_id))
        .await?;
    Ok(Json(AccessTokenResponse {
        user_id,
        access_token: access_token.0,
    }))
}

pub async fn logout(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .auth_repository()
        .delete_token(&user.access_token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
