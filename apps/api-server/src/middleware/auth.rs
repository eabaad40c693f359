//! Authentication middleware and extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use murmur_core::ports::{AuthError, TokenService};

/// Name of the cookie carrying the identity token.
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated caller identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
///
/// A request either yields a verified `Identity` or is rejected before the
/// handler runs; no partial identity is ever passed downstream.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: uuid::Uuid,
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
            AuthError::TokenExpired => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::MissingAuth => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use murmur_shared::ErrorResponse;

        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Provide a Bearer token in the Authorization header or a token cookie."),
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

/// Locate a token: the `Authorization: Bearer` header wins over the cookie
/// when both are present. A malformed header is rejected outright rather
/// than falling back to the cookie.
fn token_from_request(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

        return Ok(token.to_string());
    }

    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    Err(AuthError::MissingAuth)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Get token service from app data
        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(AuthenticationError(AuthError::InvalidToken(
                    "Server configuration error".to_string(),
                ))));
            }
        };

        let token = match token_from_request(req) {
            Ok(token) => token,
            Err(e) => return ready(Err(AuthenticationError(e))),
        };

        match token_service.validate_token(&token) {
            Ok(claims) => ready(Ok(Identity {
                user_id: claims.user_id,
            })),
            Err(e) => ready(Err(AuthenticationError(e))),
        }
    }
}
