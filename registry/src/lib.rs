use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    redis::RedisClient,
    repository::{
        auth::AuthRepositoryImpl, book::BookRepositoryImpl, borrow::BorrowRepositoryImpl,
        health::HealthCheckRepositoryImpl, reservation::ReservationRepositoryImpl,
        user::UserRepositoryImpl,
    },
};
use kernel::repository::{
    auth::AuthRepository, book::BookRepository, borrow::BorrowRepository,
    health::HealthCheckRepository, reservation::ReservationRepository, user::UserRepository,
};
use shared::config::AppConfig;

/// Wires every repository implementation once at startup; handlers reach them
/// through [`AppRegistryExt`] only, never through concrete adapter types.
#[derive(Clone)]
pub struct AppRegistryImpl {
    book_repository: Arc<dyn BookRepository>,
    borrow_repository: Arc<dyn BorrowRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    health_check_repository: Arc<dyn HealthCheckRepository>,
}

impl AppRegistryImpl {
    pub fn new(pool: ConnectionPool, kv: Arc<RedisClient>, app_config: AppConfig) -> Self {
        let book_repository = Arc::new(BookRepositoryImpl::new(pool.clone()));
        let borrow_repository = Arc::new(BorrowRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            kv.clone(),
            app_config.auth.ttl,
        ));
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool));
        Self {
            book_repository,
            borrow_repository,
            reservation_repository,
            user_repository,
            auth_repository,
            health_check_repository,
        }
    }
}

#[mockall::automock]
pub trait AppRegistryExt {
    fn book_repository(&self) -> Arc<dyn BookRepository>;
    fn borrow_repository(&self) -> Arc<dyn BorrowRepository>;
    fn reservation_repository(&self) -> Arc<dyn ReservationRepository>;
    fn user_repository(&self) -> Arc<dyn UserRepository>;
    fn auth_repository(&self) -> Arc<dyn AuthRepository>;
    fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository>;
}

impl AppRegistryExt for AppRegistryImpl {
    fn book_repository(&self) -> Arc<dyn BookRepository> {
        self.book_repository.clone()
    }

    fn borrow_repository(&self) -> Arc<dyn BorrowRepository> {
        self.borrow_repository.clone()
    }

    fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }
}

pub type AppRegistry = Arc<AppRegistryImpl>;
