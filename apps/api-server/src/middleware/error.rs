//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::error::{DomainError, RepoError, ValidationError};
use blog_core::ports::AuthError;
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    Conflict(String),
    Internal(String),
    Validation(ValidationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(err) => write!(f, "Validation failed: {}", err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized()
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AppError::Forbidden(detail) => ErrorResponse::forbidden().with_detail(detail),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(err) => {
                tracing::debug!(kind = err.kind(), "Request rejected: {}", err);
                let response = ErrorResponse::bad_request(err.to_string()).with_kind(err.kind());
                match err.allowed() {
                    Some(allowed) => response.with_allowed(allowed.to_vec()),
                    None => response,
                }
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::PostNotFound(_) => AppError::NotFound(err.to_string()),
            DomainError::Validation(inner) => AppError::Validation(inner),
            DomainError::NotAuthor(_) => AppError::Forbidden(err.to_string()),
            DomainError::Storage(inner) => inner.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Io(msg) => {
                tracing::error!("Storage I/O error: {}", msg);
                AppError::Internal("Storage error".to_string())
            }
            RepoError::Serialization(msg) => {
                tracing::error!("Storage serialization error: {}", msg);
                AppError::Internal("Storage error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingAuth => AppError::Unauthorized,
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::from(ValidationError::NonIntegerPaginationParam);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_domain_mapping() {
        assert_eq!(
            AppError::from(DomainError::PostNotFound(3)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(DomainError::NotAuthor(3)).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_storage_failure_behind_domain_error_is_internal() {
        let err = AppError::from(DomainError::from(RepoError::Io("disk".to_string())));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_repo_mapping() {
        assert_eq!(
            AppError::from(RepoError::Constraint("dup".to_string())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepoError::Io("disk".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_mapping() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::TokenExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::HashingError("x".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
