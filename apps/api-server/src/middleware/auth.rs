//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use blog_core::ports::{AuthError, TokenClaims, TokenService};
use blog_shared::ErrorResponse;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                actix_web::http::StatusCode::UNAUTHORIZED
            }
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            _ => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

/// Resolve the bearer token on `req`, if any.
///
/// `Ok(None)` means no `Authorization` header was sent. A header that is
/// present but malformed or carries a bad token is an error.
fn bearer_identity(req: &HttpRequest) -> Result<Option<Identity>, AuthError> {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token_service = req
        .app_data::<actix_web::web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AuthError::InvalidToken("Server configuration error".to_string())
        })?;

    let token = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    let claims = token_service.validate_token(token.trim())?;
    Ok(Some(Identity::from(claims)))
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match bearer_identity(req) {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Err(AuthenticationError(AuthError::MissingAuth)),
            Err(e) => Err(AuthenticationError(e)),
        })
    }
}

/// Identity if a bearer token was sent, `None` for anonymous requests.
///
/// An invalid token is still rejected rather than downgraded to anonymous.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            bearer_identity(req)
                .map(OptionalIdentity)
                .map_err(AuthenticationError),
        )
    }
}
