//! Post repository over an in-memory snapshot with optional JSON backing.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::DomainError;
use blog_core::domain::{Comment, Post, PostDraft, next_post_id};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

use super::json_file::JsonFile;

/// Post repository. Ids are assigned here, as max existing id + 1.
pub struct JsonPostRepository {
    posts: RwLock<Vec<Post>>,
    file: Option<JsonFile>,
}

impl JsonPostRepository {
    /// Repository without a backing file; data is lost on restart.
    pub fn in_memory(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            file: None,
        }
    }

    /// Repository backed by the JSON file at `path`, loading what is there.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let file = JsonFile::new(path);
        let posts: Vec<Post> = file.load().await?;
        tracing::info!(path = %file.path().display(), count = posts.len(), "Posts loaded");

        Ok(Self {
            posts: RwLock::new(posts),
            file: Some(file),
        })
    }

    /// Apply `change` to a copy of the collection, persist it, then publish it.
    ///
    /// The write lock is held throughout; a failed `change` or save leaves the
    /// published collection untouched.
    async fn mutate<F, R, E>(&self, change: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<Post>) -> Result<R, E> + Send,
        R: Send,
        E: From<RepoError>,
    {
        let mut posts = self.posts.write().await;
        let mut next = posts.clone();
        let result = change(&mut next)?;

        if let Some(file) = &self.file {
            file.save(&next).await?;
        }
        *posts = next;

        Ok(result)
    }
}

#[async_trait]
impl BaseRepository<Post, u64> for JsonPostRepository {
    async fn find_by_id(&self, id: u64) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.mutate(|posts| {
            let slot = posts
                .iter_mut()
                .find(|p| p.id == post.id)
                .ok_or(RepoError::NotFound)?;
            *slot = post.clone();
            Ok(post)
        })
        .await
    }

    async fn delete(&self, id: u64) -> Result<(), RepoError> {
        self.mutate(|posts| {
            let index = posts
                .iter()
                .position(|p| p.id == id)
                .ok_or(RepoError::NotFound)?;
            posts.remove(index);
            Ok::<_, RepoError>(())
        })
        .await?;

        tracing::debug!(post_id = id, "Post deleted");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for JsonPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        let post = self
            .mutate(|posts| {
                post.id = next_post_id(posts);
                posts.push(post.clone());
                Ok::<_, RepoError>(post)
            })
            .await?;

        tracing::debug!(post_id = post.id, "Post created");
        Ok(post)
    }

    async fn add_comment(&self, post_id: u64, comment: Comment) -> Result<Post, RepoError> {
        self.mutate(|posts| {
            let post = posts
                .iter_mut()
                .find(|p| p.id == post_id)
                .ok_or(RepoError::NotFound)?;
            post.comments.push(comment);
            Ok(post.clone())
        })
        .await
    }

    async fn update(
        &self,
        post_id: u64,
        editor: Option<&str>,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        self.mutate(|posts| {
            let post = posts
                .iter_mut()
                .find(|p| p.id == post_id)
                .ok_or(DomainError::PostNotFound(post_id))?;
            post.ensure_editable_by(editor)?;
            post.apply_update(draft);
            Ok(post.clone())
        })
        .await
    }

    async fn remove(&self, post_id: u64, editor: Option<&str>) -> Result<Post, DomainError> {
        let removed = self
            .mutate(|posts| {
                let index = posts
                    .iter()
                    .position(|p| p.id == post_id)
                    .ok_or(DomainError::PostNotFound(post_id))?;
                posts[index].ensure_editable_by(editor)?;
                Ok::<_, DomainError>(posts.remove(index))
            })
            .await?;

        tracing::debug!(post_id, "Post removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json_file::tests::temp_file;
    use std::sync::Arc;

    fn post(title: &str) -> Post {
        Post {
            id: 0,
            title: title.to_string(),
            content: "body".to_string(),
            author: "jane".to_string(),
            date: "2025-04-14".to_string(),
            category: String::new(),
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn comment(text: &str) -> Comment {
        Comment {
            author: "john".to_string(),
            text: text.to_string(),
            timestamp: "2025-04-14 12:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_next_id() {
        let repo = JsonPostRepository::in_memory(Vec::new());

        let first = repo.insert(post("first")).await.unwrap();
        let second = repo.insert(post("second")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_below_max() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        repo.insert(post("a")).await.unwrap();
        repo.insert(post("b")).await.unwrap();
        repo.insert(post("c")).await.unwrap();

        repo.delete(2).await.unwrap();
        let next = repo.insert(post("d")).await.unwrap();

        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        let mut stored = repo.insert(post("draft")).await.unwrap();

        stored.title = "final".to_string();
        repo.save(stored).await.unwrap();

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.title, "final");
    }

    #[tokio::test]
    async fn test_save_unknown_is_not_found() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        let mut ghost = post("ghost");
        ghost.id = 42;

        assert!(matches!(repo.save(ghost).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        assert!(matches!(repo.delete(1).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_add_comment_appends() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        repo.insert(post("p")).await.unwrap();

        repo.add_comment(1, comment("one")).await.unwrap();
        let updated = repo.add_comment(1, comment("two")).await.unwrap();

        let texts: Vec<&str> = updated.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert!(matches!(
            repo.add_comment(9, comment("x")).await,
            Err(RepoError::NotFound)
        ));
    }

    fn edit(title: &str) -> PostDraft {
        PostDraft {
            title: Some(title.to_string()),
            content: Some("edited".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_keeps_comments_added_after_a_read() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        repo.insert(post("p")).await.unwrap();

        let _seen = repo.find_by_id(1).await.unwrap().unwrap();
        repo.add_comment(1, comment("meanwhile")).await.unwrap();
        let updated = repo.update(1, Some("jane"), edit("renamed")).await.unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.comments.len(), 1);
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().comments.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_and_comments_are_all_kept() {
        let path = temp_file("posts-concurrent");
        let repo = Arc::new(JsonPostRepository::open(&path).await.unwrap());
        repo.insert(post("p")).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..8 {
            let commenter = repo.clone();
            tasks.push(tokio::spawn(async move {
                commenter.add_comment(1, comment(&format!("c{i}"))).await.map(|_| ())
            }));
            let editor = repo.clone();
            tasks.push(tokio::spawn(async move {
                editor
                    .update(1, Some("jane"), edit(&format!("t{i}")))
                    .await
                    .map(|_| ())
                    .map_err(|_| RepoError::NotFound)
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.comments.len(), 8);
        assert_eq!(stored.content, "edited");
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_update_rejects_other_authors_without_writing() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        repo.insert(post("p")).await.unwrap();

        let err = repo.update(1, Some("mallory"), edit("x")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotAuthor(1)));
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().title, "p");

        let err = repo.update(5, Some("jane"), edit("x")).await.unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(5)));
    }

    #[tokio::test]
    async fn test_remove_checks_authorship() {
        let repo = JsonPostRepository::in_memory(Vec::new());
        repo.insert(post("p")).await.unwrap();

        assert!(matches!(
            repo.remove(1, Some("mallory")).await,
            Err(DomainError::NotAuthor(1))
        ));
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let removed = repo.remove(1, Some("jane")).await.unwrap();
        assert_eq!(removed.title, "p");
        assert!(repo.list().await.unwrap().is_empty());
        assert!(matches!(
            repo.remove(1, None).await,
            Err(DomainError::PostNotFound(1))
        ));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let path = temp_file("posts");

        {
            let repo = JsonPostRepository::open(&path).await.unwrap();
            repo.insert(post("kept")).await.unwrap();
            repo.add_comment(1, comment("hi")).await.unwrap();
        }

        let reopened = JsonPostRepository::open(&path).await.unwrap();
        let posts = reopened.list().await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "kept");
        assert_eq!(posts[0].comments.len(), 1);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let repo = JsonPostRepository {
            posts: RwLock::new(Vec::new()),
            file: Some(JsonFile::new(temp_file("gone").join("posts.json"))),
        };

        assert!(repo.insert(post("lost")).await.is_err());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
