//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Response containing an authentication token and the profile it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Request to create a post. Visibility defaults to public.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub is_public: Option<bool>,
}

/// Request to update a post. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub is_public: Option<bool>,
}

/// Request to comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// Pagination parameters for post listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// A comment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub author_id: String,
    pub author_username: String,
    pub text: String,
    pub created_at: String,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub author_username: String,
    pub content: String,
    pub is_public: bool,
    pub likes: Vec<String>,
    pub comments: Vec<CommentResponse>,
    pub created_at: String,
    pub updated_at: String,
}
