//! Authentication handlers.

use actix_web::{
    HttpResponse,
    cookie::{Cookie, SameSite},
    web,
};
use std::sync::Arc;

use murmur_core::domain::User;
use murmur_core::ports::{PasswordService, TokenService};
use murmur_shared::ApiResponse;
use murmur_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::handlers::users::user_response;
use crate::middleware::auth::{Identity, TOKEN_COOKIE};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

/// Issued tokens are also set as an HttpOnly cookie for browser clients.
fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token.to_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    let username = req.username.trim().to_string();
    let username_len = username.chars().count();
    if !(3..=50).contains(&username_len) {
        return Err(AppError::BadRequest(
            "Username must be 3-50 characters".to_string(),
        ));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Unique username and email
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if state.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // Hash password
    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // Create user
    let user = User::new(username, req.email.clone(), password_hash);
    let saved_user = state.users.save(user).await?;

    // Issue token
    let token = token_service
        .generate_token(saved_user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::debug!(user_id = %saved_user.id, "User registered");

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: token_service.expiration_seconds() as u64,
            user: user_response(&saved_user),
        }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Unknown email and wrong password fail identically.
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = token_service
        .generate_token(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: token_service.expiration_seconds() as u64,
            user: user_response(&user),
        }))
}

/// POST /api/auth/logout
///
/// Tokens are not revoked server-side; logout only removes the cookie.
pub async fn logout() -> AppResult<HttpResponse> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::message("Logged out")))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    // A token whose user no longer resolves does not grant an identity.
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}
