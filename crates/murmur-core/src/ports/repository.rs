use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. Listings are ordered newest first; rows with equal
/// creation times keep their insertion order.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Public posts, newest first, with pagination.
    async fn find_public(&self, limit: u64, offset: u64) -> Result<Vec<Post>, RepoError>;

    /// Posts by one author, newest first. Private posts are included only
    /// when `include_private` is set.
    async fn find_by_author(
        &self,
        author_id: Uuid,
        include_private: bool,
    ) -> Result<Vec<Post>, RepoError>;
}
