//! In-memory repositories - used as fallback when no database is configured,
//! and as the store for handler-level tests.
//!
//! Entities live in a `Vec` behind an async `RwLock`, so insertion order is
//! preserved and listing ties on `created_at` resolve deterministically.
//! Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use murmur_core::domain::{Post, User};
use murmur_core::error::RepoError;
use murmur_core::ports::{BaseRepository, PostRepository, UserRepository};

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        match users.iter().position(|u| u.id == id) {
            Some(pos) => {
                users.remove(pos);
                Ok(())
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; the stable sort keeps insertion order for equal timestamps.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post.clone(),
            None => posts.push(post.clone()),
        }
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        match posts.iter().position(|p| p.id == id) {
            Some(pos) => {
                posts.remove(pos);
                Ok(())
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_public(&self, limit: u64, offset: u64) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut public: Vec<Post> = posts.iter().filter(|p| p.is_public).cloned().collect();
        sort_newest_first(&mut public);

        Ok(public
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        include_private: bool,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut matched: Vec<Post> = posts
            .iter()
            .filter(|p| p.author_id == author_id && (include_private || p.is_public))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);

        Ok(matched)
    }
}
