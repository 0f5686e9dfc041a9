use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::auth::{login, logout, register};

pub fn build_auth_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout));
    Router::new().nest("/auth", routers)
}
