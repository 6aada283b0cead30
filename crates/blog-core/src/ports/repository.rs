use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, PostDraft, User};
use crate::error::{DomainError, RepoError};

/// Generic repository trait defining standard lookups and writes.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or replace).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username (case-sensitive).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// `save` replaces an existing post and fails with [`RepoError::NotFound`]
/// when the id is unknown; new posts go through `insert`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, u64> {
    /// Consistent snapshot of the whole collection, in insertion order.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Store a new post under the next free id. The incoming id is ignored.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Append a comment to a post and return the updated post.
    async fn add_comment(&self, post_id: u64, comment: Comment) -> Result<Post, RepoError>;

    /// Merge `draft` into the stored post on behalf of `editor`.
    ///
    /// Lookup, the authorship check and the write happen as one step, so a
    /// concurrent comment or edit is never overwritten by a stale copy.
    async fn update(
        &self,
        post_id: u64,
        editor: Option<&str>,
        draft: PostDraft,
    ) -> Result<Post, DomainError>;

    /// Delete a post on behalf of `editor` and return it. Atomic like `update`.
    async fn remove(&self, post_id: u64, editor: Option<&str>) -> Result<Post, DomainError>;
}
