//! User repository over an in-memory snapshot with optional JSON backing.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::User;
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, UserRepository};

use super::json_file::JsonFile;

/// User repository. Usernames are unique.
pub struct JsonUserRepository {
    users: RwLock<Vec<User>>,
    file: Option<JsonFile>,
}

impl JsonUserRepository {
    pub fn in_memory() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            file: None,
        }
    }

    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let file = JsonFile::new(path);
        let users: Vec<User> = file.load().await?;
        tracing::info!(path = %file.path().display(), count = users.len(), "Users loaded");

        Ok(Self {
            users: RwLock::new(users),
            file: Some(file),
        })
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for JsonUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' is already taken",
                user.username
            )));
        }

        let mut next = users.clone();
        match next.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => next.push(user.clone()),
        }

        if let Some(file) = &self.file {
            file.save(&next).await?;
        }
        *users = next;

        tracing::debug!(user_id = %user.id, "User saved");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        let mut next = users.clone();
        let before = next.len();
        next.retain(|u| u.id != id);
        if next.len() == before {
            return Err(RepoError::NotFound);
        }

        if let Some(file) = &self.file {
            file.save(&next).await?;
        }
        *users = next;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}
