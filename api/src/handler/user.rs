use axum::{extract::State, Json};
use registry::{AppRegistry, AppRegistryExt};
use shared::error::{AppError, AppResult};

use crate::{extractor::AuthorizedUser, model::user::UserResponse};

pub async fn current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(user.user.into())
}

pub async fn show_user_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<UserResponse>>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    let users = registry.user_repository().find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
