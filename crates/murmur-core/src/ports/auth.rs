//! Authentication ports.

use uuid::Uuid;

/// Claims carried by an identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

/// Token service trait - issues and verifies signed identity tokens.
pub trait TokenService: Send + Sync {
    /// Issue a signed, time-limited token for a user.
    fn generate_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Verify a token and decode its claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of newly issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authentication token")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
