use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    // Circulation failures. All three are request conflicts rather than server
    // faults: the caller raced another patron or broke a uniqueness rule.
    #[error("{0}")]
    BookUnavailable(String),
    #[error("{0}")]
    BookReserved(String),
    #[error("{0}")]
    ResourceConflict(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    // Multiple variants carry a sqlx::Error, so [from] cannot be used here and
    // [source] stands in for it.
    #[error("failed to run the transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowAffectedError(String),
    #[error("{0}")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("{0}")]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("authentication failed")]
    UnauthenticatedError,
    #[error("invalid authorization information")]
    UnauthorizedError,
    #[error("operation not permitted")]
    ForbiddenOperation,
    #[error("{0}")]
    ConversionEntityError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BookUnavailable(_)
            | AppError::BookReserved(_)
            | AppError::ResourceConflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) | AppError::ConvertToUuidError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnauthenticatedError | AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::UnauthorizedError => StatusCode::UNAUTHORIZED,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowAffectedError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status_code.into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circulation_failures_map_to_conflict() {
        for err in [
            AppError::BookUnavailable("no available copies".into()),
            AppError::BookReserved("reserved by another user".into()),
            AppError::ResourceConflict("already borrowed".into()),
        ] {
            let res = err.into_response();
            assert_eq!(res.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = AppError::EntityNotFound("book not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
