//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::error::RepoError;
use blog_core::ports::{PostRepository, UserRepository};
use blog_infra::{JsonPostRepository, JsonUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub require_auth: bool,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Repositories are file-backed when a path is configured and in-memory
    /// otherwise.
    pub async fn new(config: &AppConfig) -> Result<Self, RepoError> {
        let posts: Arc<dyn PostRepository> = match &config.posts_file {
            Some(path) => Arc::new(JsonPostRepository::open(path).await?),
            None => {
                tracing::warn!("POSTS_FILE not set. Posts are kept in memory only.");
                Arc::new(JsonPostRepository::in_memory(Vec::new()))
            }
        };

        let users: Arc<dyn UserRepository> = match &config.users_file {
            Some(path) => Arc::new(JsonUserRepository::open(path).await?),
            None => {
                tracing::warn!("USERS_FILE not set. Accounts are kept in memory only.");
                Arc::new(JsonUserRepository::in_memory())
            }
        };

        tracing::info!(require_auth = config.require_auth, "Application state initialized");

        Ok(Self {
            posts,
            users,
            require_auth: config.require_auth,
        })
    }

    /// State over empty in-memory repositories.
    #[cfg(test)]
    pub fn in_memory(require_auth: bool) -> Self {
        Self {
            posts: Arc::new(JsonPostRepository::in_memory(Vec::new())),
            users: Arc::new(JsonUserRepository::in_memory()),
            require_auth,
        }
    }
}
